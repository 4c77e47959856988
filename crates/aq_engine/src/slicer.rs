// crates/aq_engine/src/slicer.rs

//! 高程切片
//!
//! 把单元网格裁剪到给定高程（含）以下，封闭截面，再按边连通拆分。

use aq_geo::{Plane, Point3D};
use aq_mesh::{GeometryKernel, TriMesh};

/// 裁剪到 `max_z` 以下并封闭截面，结果可能为空网格
pub fn cut_below<K: GeometryKernel + ?Sized>(kernel: &K, mesh: &TriMesh, max_z: f64) -> TriMesh {
    kernel.clip_to_half_space(mesh, &Plane::horizontal(max_z), true)
}

/// 切片并拆分为连通片段，没有剩余几何时返回空列表
pub fn slice<K: GeometryKernel + ?Sized>(kernel: &K, mesh: &TriMesh, max_z: f64) -> Vec<TriMesh> {
    let cut = cut_below(kernel, mesh, max_z);
    if cut.is_empty() {
        return Vec::new();
    }
    kernel.connected_components(&cut)
}

/// 切片后只保留离 `point` 最近的片段
pub fn slice_nearest<K: GeometryKernel + ?Sized>(
    kernel: &K,
    mesh: &TriMesh,
    max_z: f64,
    point: &Point3D,
) -> Option<TriMesh> {
    let cut = cut_below(kernel, mesh, max_z);
    let face = kernel.nearest_face(&cut, point)?;
    Some(kernel.keep_component_containing(&cut, face))
}
