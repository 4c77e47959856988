// crates\aq_foundation\src/lib.rs

//! Aquifer Foundation Layer
//!
//! 基础层，提供整个工作区的基础抽象。
//!
//! # 模块概览
//!
//! - [`arena`]: 只追加的泛型 Arena 与强类型索引
//! - [`error`]: 统一错误类型
//! - [`tolerance`]: 几何容差
//! - [`validation`]: 网格验证报告
//!
//! # 设计原则
//!
//! 1. **最少依赖**: 仅依赖 serde 和 thiserror
//! 2. **类型安全**: 编译期防止索引误用
//! 3. **无全局状态**: 容差等参数通过调用方注入
//!
//! # 示例
//!
//! ```
//! use aq_foundation::{
//!     arena::{Arena, ArenaTag},
//!     error::{AqError, AqResult},
//! };
//!
//! #[derive(Debug, Clone, Copy)]
//! struct UnitTag;
//! impl ArenaTag for UnitTag {}
//!
//! let mut arena: Arena<f64, UnitTag> = Arena::new();
//! let idx = arena.push(42.0);
//! assert_eq!(arena[idx], 42.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod error;
pub mod tolerance;
pub mod validation;

// 重导出常用类型
pub use arena::{Arena, ArenaTag, Idx};
pub use error::{AqError, AqResult};
pub use tolerance::GeometricTolerance;
pub use validation::{ValidationError, ValidationReport, ValidationWarning};
