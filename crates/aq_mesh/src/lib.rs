// crates\aq_mesh\src/lib.rs

//! Aquifer 网格模块
//!
//! 提供索引三角网格及含水层计算所需的全部几何操作。
//!
//! # 核心类型
//!
//! - [`TriMesh`]: 顶点数组 + 三角形索引的网格
//! - [`GeometryKernel`]: 几何操作接口，[`TriMeshKernel`] 为默认实现
//!
//! # 模块结构
//!
//! - [`validate`]: 闭合流形检查
//! - [`clip`]: 半空间裁剪与截面封闭
//! - [`triangulate`]: 带洞多边形的耳切三角化
//! - [`topology`]: 连通分量
//! - [`spatial_index`]: 三角形 R-Tree
//! - [`intersect`]: 表面相交检测
//! - [`measure`]: 体积与面积
//! - [`generation`]: 测试和演示用的网格生成
//! - [`io`]: 网格 IO (OFF, AQB)
//!
//! # 示例
//!
//! ```rust
//! use aq_geo::{Plane, Point3D};
//! use aq_mesh::generation::box_mesh;
//! use aq_mesh::{GeometryKernel, TriMeshKernel};
//!
//! let kernel = TriMeshKernel::default();
//! let mesh = box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
//!
//! // 切掉上半部分并封闭截面
//! let lower = kernel.clip_to_half_space(&mesh, &Plane::horizontal(0.5), true);
//! assert!(kernel.is_closed_manifold(&lower));
//! assert!((kernel.volume(&lower) - 0.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clip;
pub mod error;
pub mod generation;
pub mod intersect;
pub mod io;
pub mod kernel;
pub mod measure;
pub mod spatial_index;
pub mod topology;
pub mod triangulate;
pub mod trimesh;
pub mod validate;

// 重新导出核心类型
pub use error::{MeshError, MeshResult};
pub use io::{load_mesh, load_mesh_file, save_mesh, save_mesh_file, MeshFormat};
pub use kernel::{GeometryKernel, TriMeshKernel};
pub use spatial_index::MeshSpatialIndex;
pub use trimesh::{FaceIndex, TriMesh};
