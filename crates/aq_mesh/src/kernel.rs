// crates/aq_mesh/src/kernel.rs

//! 几何内核接口
//!
//! 含水层计算只通过 [`GeometryKernel`] 使用网格几何操作。
//! [`TriMeshKernel`] 是基于本 crate 算法的默认实现，
//! 所有带容差的判定都按参与运算网格的包围盒对角线换算绝对容差。

use aq_foundation::tolerance::GeometricTolerance;
use aq_geo::{Plane, Point3D};

use crate::clip;
use crate::intersect::meshes_intersect;
use crate::measure::signed_volume;
use crate::spatial_index::MeshSpatialIndex;
use crate::topology;
use crate::trimesh::{FaceIndex, TriMesh};
use crate::validate;

/// 几何内核
pub trait GeometryKernel: Send + Sync {
    /// 是否为闭合二维流形
    fn is_closed_manifold(&self, mesh: &TriMesh) -> bool;

    /// 裁剪到平面下方，`close_holes` 为真时封闭截面
    fn clip_to_half_space(&self, mesh: &TriMesh, plane: &Plane, close_holes: bool) -> TriMesh;

    /// 按边连通拆分
    fn connected_components(&self, mesh: &TriMesh) -> Vec<TriMesh>;

    /// 两个网格表面是否相交（接触计为相交）
    fn intersects(&self, a: &TriMesh, b: &TriMesh) -> bool;

    /// 距离点最近的面，空网格返回 `None`
    fn nearest_face(&self, mesh: &TriMesh, point: &Point3D) -> Option<FaceIndex>;

    /// 只保留包含指定面的连通分量
    fn keep_component_containing(&self, mesh: &TriMesh, face: FaceIndex) -> TriMesh;

    /// 闭合网格围成的有向体积
    fn volume(&self, mesh: &TriMesh) -> f64;
}

/// 默认几何内核
#[derive(Debug, Clone, Copy, Default)]
pub struct TriMeshKernel {
    tolerance: GeometricTolerance,
}

impl TriMeshKernel {
    /// 使用给定容差创建
    pub fn new(tolerance: GeometricTolerance) -> Self {
        Self { tolerance }
    }

    /// 当前容差
    pub fn tolerance(&self) -> GeometricTolerance {
        self.tolerance
    }

    fn eps_for(&self, meshes: &[&TriMesh]) -> f64 {
        let scale = meshes
            .iter()
            .map(|m| m.bbox().diagonal())
            .fold(0.0, f64::max);
        self.tolerance.absolute(scale)
    }
}

impl GeometryKernel for TriMeshKernel {
    fn is_closed_manifold(&self, mesh: &TriMesh) -> bool {
        validate::is_closed_manifold(mesh)
    }

    fn clip_to_half_space(&self, mesh: &TriMesh, plane: &Plane, close_holes: bool) -> TriMesh {
        clip::clip_to_half_space(mesh, plane, close_holes, self.eps_for(&[mesh]))
    }

    fn connected_components(&self, mesh: &TriMesh) -> Vec<TriMesh> {
        topology::connected_components(mesh)
    }

    fn intersects(&self, a: &TriMesh, b: &TriMesh) -> bool {
        meshes_intersect(a, b, self.eps_for(&[a, b]))
    }

    fn nearest_face(&self, mesh: &TriMesh, point: &Point3D) -> Option<FaceIndex> {
        MeshSpatialIndex::build(mesh).nearest_face(point)
    }

    fn keep_component_containing(&self, mesh: &TriMesh, face: FaceIndex) -> TriMesh {
        topology::keep_component_containing(mesh, face)
    }

    fn volume(&self, mesh: &TriMesh) -> f64 {
        signed_volume(mesh)
    }
}
