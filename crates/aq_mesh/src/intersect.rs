// crates/aq_mesh/src/intersect.rs

//! 网格相交检测
//!
//! 只检测表面：两个网格的任一对三角形在容差内接触即视为相交。
//! 一个网格完全包含在另一个网格内部而表面不接触时，结果为不相交。
//!
//! 粗筛先比较整体包围盒，再对面数较多的网格建 R-Tree，
//! 用另一个网格每个三角形的外扩包围盒查询候选对；细筛逐对做三角形相交判定。

use aq_geo::predicates::triangles_intersect;
use rayon::prelude::*;

use crate::spatial_index::{MeshSpatialIndex, TriangleEnvelope};
use crate::trimesh::TriMesh;

/// 两个网格表面是否相交（接触计为相交）
pub fn meshes_intersect(a: &TriMesh, b: &TriMesh, eps: f64) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if !a.bbox().intersects(&b.bbox(), eps) {
        return false;
    }

    let (small, large) = if a.n_faces() <= b.n_faces() { (a, b) } else { (b, a) };
    let large_bbox = large.bbox().expand(eps);
    let index = MeshSpatialIndex::build(large);

    let probes: Vec<TriangleEnvelope> = small
        .triangles()
        .enumerate()
        .map(|(f, tri)| TriangleEnvelope::new(f as u32, tri))
        .filter(|probe| probe.bbox().intersects(&large_bbox, 0.0))
        .collect();

    probes.par_iter().any(|probe| {
        let query = probe.bbox().expand(eps);
        index
            .query_bbox(&query)
            .any(|candidate| triangles_intersect(&probe.triangle, &candidate.triangle, eps))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::box_mesh;
    use aq_geo::Point3D;

    const EPS: f64 = 1e-9;

    fn unit_box_at(x: f64, y: f64, z: f64) -> TriMesh {
        box_mesh(Point3D::new(x, y, z), Point3D::new(x + 1.0, y + 1.0, z + 1.0))
    }

    #[test]
    fn test_identical_meshes_intersect() {
        let a = unit_box_at(0.0, 0.0, 0.0);
        assert!(meshes_intersect(&a, &a.clone(), EPS));
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let a = unit_box_at(0.0, 0.0, 0.0);
        let b = unit_box_at(1.0, 0.0, -0.3);
        assert!(meshes_intersect(&a, &b, EPS));
        assert!(meshes_intersect(&b, &a, EPS));
    }

    #[test]
    fn test_edge_contact_intersects() {
        let a = unit_box_at(0.0, 0.0, 0.0);
        let b = unit_box_at(1.0, 1.0, 0.0);
        assert!(meshes_intersect(&a, &b, EPS));
    }

    #[test]
    fn test_separated_boxes() {
        let a = unit_box_at(0.0, 0.0, 0.0);
        let b = unit_box_at(1.001, 0.0, 0.0);
        assert!(!meshes_intersect(&a, &b, EPS));
        let far = unit_box_at(99.0, 0.0, 0.0);
        assert!(!meshes_intersect(&a, &far, EPS));
    }

    #[test]
    fn test_nested_without_contact_is_not_intersecting() {
        let outer = box_mesh(Point3D::new(-2.0, -2.0, -2.0), Point3D::new(2.0, 2.0, 2.0));
        let inner = unit_box_at(0.0, 0.0, 0.0);
        assert!(!meshes_intersect(&outer, &inner, EPS));
    }

    #[test]
    fn test_overlapping_boxes() {
        let a = unit_box_at(0.0, 0.0, 0.0);
        let b = unit_box_at(0.5, 0.5, 0.5);
        assert!(meshes_intersect(&a, &b, EPS));
    }

    #[test]
    fn test_empty_mesh_never_intersects() {
        assert!(!meshes_intersect(&TriMesh::new(), &unit_box_at(0.0, 0.0, 0.0), EPS));
    }
}
