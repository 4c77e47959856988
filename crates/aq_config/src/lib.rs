// crates/aq_config/src/lib.rs

//! Aquifer Config Layer
//!
//! 配置层，提供引擎参数和输出参数，JSON 序列化。
//!
//! # 模块概览
//!
//! - [`aquifer_config`]: AquiferConfig / EngineConfig / OutputConfig
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: aq_cli      ─> uses AquiferConfig
//! Layer 4: aq_engine   ─> uses EngineConfig
//! Layer 3: aq_config   ─> AquiferConfig (本层)
//! Layer 2: aq_mesh
//! Layer 1: aq_foundation, aq_geo
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aquifer_config;
pub mod error;

// 重导出核心类型
pub use aquifer_config::{AquiferConfig, EngineConfig, OutputConfig, PropagationStrategy};
pub use error::ConfigError;
