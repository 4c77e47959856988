// crates\aq_mesh\src/spatial_index.rs

//! 网格空间索引
//!
//! 基于 R-Tree 的三角形索引，使用 rstar crate 实现。
//!
//! # 功能特性
//!
//! - 最近面查询：按点到三角形的精确距离排序，O(log n)
//! - 包围盒查询：找出包围盒与给定范围相交的所有三角形，用于相交检测的粗筛
//!
//! # 示例
//!
//! ```
//! use aq_geo::Point3D;
//! use aq_mesh::generation::box_mesh;
//! use aq_mesh::spatial_index::MeshSpatialIndex;
//!
//! let mesh = box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
//! let index = MeshSpatialIndex::build(&mesh);
//!
//! let face = index.nearest_face(&Point3D::new(0.5, 0.5, 3.0)).unwrap();
//! // 最近的是顶面
//! assert!(mesh.face_normal(face.as_usize()).z > 0.0);
//! ```

use aq_geo::predicates::point_triangle_distance_squared;
use aq_geo::{BoundingBox3D, Point3D, Triangle};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::trimesh::{FaceIndex, TriMesh};

/// 三角形条目
///
/// 存储三角形坐标和它在网格中的面索引。
#[derive(Debug, Clone)]
pub struct TriangleEnvelope {
    /// 面索引
    pub face: u32,
    /// 三个顶点
    pub triangle: Triangle,
}

impl TriangleEnvelope {
    /// 创建条目
    pub fn new(face: u32, triangle: Triangle) -> Self {
        Self { face, triangle }
    }

    /// 三角形包围盒
    pub fn bbox(&self) -> BoundingBox3D {
        BoundingBox3D::from_points(self.triangle)
    }
}

impl RTreeObject for TriangleEnvelope {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        let [a, b, c] = self.triangle;
        let min = a.min(&b).min(&c);
        let max = a.max(&b).max(&c);
        AABB::from_corners(min.to_array(), max.to_array())
    }
}

impl PointDistance for TriangleEnvelope {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        point_triangle_distance_squared(&Point3D::from(*point), &self.triangle)
    }

    fn contains_point(&self, point: &[f64; 3]) -> bool {
        self.distance_2(point) == 0.0
    }
}

/// 网格三角形空间索引
pub struct MeshSpatialIndex {
    tree: RTree<TriangleEnvelope>,
}

impl MeshSpatialIndex {
    /// 从网格构建（批量加载）
    pub fn build(mesh: &TriMesh) -> Self {
        let envelopes: Vec<TriangleEnvelope> = mesh
            .triangles()
            .enumerate()
            .map(|(f, tri)| TriangleEnvelope::new(f as u32, tri))
            .collect();
        Self {
            tree: RTree::bulk_load(envelopes),
        }
    }

    /// 三角形数
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// 距离点最近的面
    pub fn nearest_face(&self, point: &Point3D) -> Option<FaceIndex> {
        self.tree
            .nearest_neighbor(&point.to_array())
            .map(|entry| FaceIndex::new(entry.face))
    }

    /// 包围盒与 `bbox` 相交的三角形
    pub fn query_bbox(&self, bbox: &BoundingBox3D) -> impl Iterator<Item = &TriangleEnvelope> {
        let envelope = AABB::from_corners(bbox.min.to_array(), bbox.max.to_array());
        self.tree.locate_in_envelope_intersecting(&envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::box_mesh;

    #[test]
    fn test_nearest_face_picks_closest_side() {
        let mesh = box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
        let index = MeshSpatialIndex::build(&mesh);
        assert_eq!(index.len(), 12);

        let face = index.nearest_face(&Point3D::new(2.0, 0.5, 0.5)).unwrap();
        assert!(mesh.face_normal(face.as_usize()).x > 0.0);

        // 内部点
        let face = index.nearest_face(&Point3D::new(0.5, 0.5, 0.05)).unwrap();
        assert!(mesh.face_normal(face.as_usize()).z < 0.0);
    }

    #[test]
    fn test_empty_index() {
        let index = MeshSpatialIndex::build(&TriMesh::new());
        assert!(index.is_empty());
        assert!(index.nearest_face(&Point3D::ZERO).is_none());
    }

    #[test]
    fn test_query_bbox() {
        let mesh = box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
        let index = MeshSpatialIndex::build(&mesh);
        let bbox = BoundingBox3D::new(Point3D::new(0.9, 0.2, 0.2), Point3D::new(1.5, 0.8, 0.8));
        let hits: Vec<&TriangleEnvelope> = index.query_bbox(&bbox).collect();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|e| e.bbox().intersects(&bbox, 0.0)));
        // x = 0 的面不会命中
        assert!(hits.iter().all(|e| mesh.face_normal(e.face as usize).x >= 0.0));
    }
}
