// crates\aq_geo\src/lib.rs
//! Aquifer 几何基元
//!
//! 提供网格计算所需的基础几何类型与谓词。
//!
//! # 模块
//!
//! - `geometry`: 几何类型 (Point2D, Point3D)
//! - `bbox`: 3D 轴对齐包围盒
//! - `plane`: 切割平面
//! - `predicates`: 三角形相交、最近点、二维多边形判定
//!
//! # 示例
//!
//! ```
//! use aq_geo::prelude::*;
//!
//! let plane = Plane::horizontal(0.5);
//! assert!(plane.signed_distance(&Point3D::new(0.0, 0.0, 0.25)) < 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bbox;
pub mod geometry;
pub mod plane;
pub mod predicates;

/// 预导入模块
pub mod prelude {
    pub use crate::bbox::BoundingBox3D;
    pub use crate::geometry::{Point2D, Point3D};
    pub use crate::plane::Plane;
    pub use crate::predicates::{triangles_intersect, Triangle};
}

// 重导出常用类型
pub use bbox::BoundingBox3D;
pub use geometry::{Point2D, Point3D};
pub use plane::Plane;
pub use predicates::Triangle;
