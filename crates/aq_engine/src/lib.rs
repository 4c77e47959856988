// crates/aq_engine/src/lib.rs

//! Aquifer Engine
//!
//! 含水层传播引擎：给定一组闭合的地质单元网格和锚定在单元上的泉点，
//! 计算每个泉点截断高程以下、经由相互接触的单元连通的地下水体。
//!
//! # 模块概览
//!
//! - [`model`]: Unit / Spring / Candidate / BodyElement
//! - [`slicer`]: 高程切片
//! - [`extract`]: 初始片段提取
//! - [`propagation`]: 候选池与工作队列传播
//! - [`calculator`]: 计算流程编排
//! - [`volume`]: 体积计算
//!
//! # 示例
//!
//! ```
//! use aq_engine::{AquiferCalculator, Spring, Unit};
//! use aq_geo::Point3D;
//! use aq_mesh::generation::box_mesh;
//!
//! let unit = Unit::new(1, box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0)));
//! let spring = Spring::new(10, Point3D::new(0.5, 0.5, 0.5), 1);
//!
//! let bodies = AquiferCalculator::default().calculate(&[unit], &[spring]).unwrap();
//! assert_eq!(bodies.len(), 1);
//! assert!((bodies[0].volume - 0.5).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calculator;
pub mod error;
pub mod extract;
pub mod model;
pub mod propagation;
pub mod slicer;
pub mod volume;

pub use calculator::{order_springs, AquiferCalculator};
pub use error::{EngineError, EngineResult};
pub use model::{BodyElement, Candidate, CandidateState, Spring, SpringId, Unit, UnitId};
pub use propagation::{CandidatePool, PropagationStats, Propagator};
