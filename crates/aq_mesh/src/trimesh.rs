// crates/aq_mesh/src/trimesh.rs

//! 索引三角网格
//!
//! 顶点数组加三角形索引数组的最简表示。单元网格、切片碎片和
//! 输出的含水层网格都使用这一结构，所有几何操作都返回新网格，
//! 不修改输入。

use aq_foundation::arena::{ArenaTag, Idx};
use aq_geo::{BoundingBox3D, Point3D, Triangle};

use crate::error::{MeshError, MeshResult};

/// 面索引标记
#[derive(Debug, Clone, Copy)]
pub struct FaceTag;
impl ArenaTag for FaceTag {}

/// 面索引
pub type FaceIndex = Idx<FaceTag>;

/// 索引三角网格
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    vertices: Vec<Point3D>,
    faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// 创建空网格
    pub fn new() -> Self {
        Self::default()
    }

    /// 由顶点和面创建，检查顶点索引
    pub fn from_parts(vertices: Vec<Point3D>, faces: Vec<[u32; 3]>) -> MeshResult<Self> {
        let n = vertices.len();
        if let Some((f, v)) = faces
            .iter()
            .enumerate()
            .find_map(|(f, tri)| tri.iter().find(|&&v| v as usize >= n).map(|&v| (f, v)))
        {
            return Err(MeshError::invalid_topology(
                "from_parts",
                format!("face {f} references vertex {v}, mesh has {n} vertices"),
            ));
        }
        Ok(Self { vertices, faces })
    }

    /// 顶点数组
    #[inline]
    pub fn vertices(&self) -> &[Point3D] {
        &self.vertices
    }

    /// 面数组
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// 顶点数
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// 面数
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// 是否没有任何面
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// 添加顶点
    pub fn add_vertex(&mut self, p: Point3D) -> u32 {
        self.vertices.push(p);
        (self.vertices.len() - 1) as u32
    }

    /// 添加三角形（调用方保证索引有效）
    pub fn add_face(&mut self, tri: [u32; 3]) -> FaceIndex {
        debug_assert!(tri.iter().all(|&v| (v as usize) < self.vertices.len()));
        self.faces.push(tri);
        FaceIndex::from_usize(self.faces.len() - 1)
    }

    /// 面的三个顶点坐标
    #[inline]
    pub fn triangle(&self, face: usize) -> Triangle {
        let [a, b, c] = self.faces[face];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// 按面顺序遍历三角形
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        (0..self.faces.len()).map(move |f| self.triangle(f))
    }

    /// 面的非单位法向（长度为面积的两倍）
    pub fn face_normal(&self, face: usize) -> Point3D {
        let [a, b, c] = self.triangle(face);
        (b - a).cross(&(c - a))
    }

    /// 被面引用的顶点的包围盒
    pub fn bbox(&self) -> BoundingBox3D {
        BoundingBox3D::from_points(
            self.faces
                .iter()
                .flat_map(|tri| tri.iter().map(|&v| self.vertices[v as usize])),
        )
    }

    /// 平移后的副本
    pub fn translated(&self, offset: Point3D) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&p| p + offset).collect(),
            faces: self.faces.clone(),
        }
    }

    /// 所有面翻转方向后的副本
    pub fn flipped(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            faces: self.faces.iter().map(|&[a, b, c]| [a, c, b]).collect(),
        }
    }

    /// 追加另一个网格（不合并顶点）
    pub fn append(&mut self, other: &TriMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces
            .extend(other.faces.iter().map(|tri| tri.map(|v| v + offset)));
    }

    /// 由面子集构建新网格，顶点按首次出现的顺序重新编号
    pub fn submesh<I>(&self, faces: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut out = TriMesh::new();
        for f in faces {
            let tri = self.faces[f].map(|v| {
                let slot = &mut remap[v as usize];
                if *slot == u32::MAX {
                    *slot = out.add_vertex(self.vertices[v as usize]);
                }
                *slot
            });
            out.faces.push(tri);
        }
        out
    }

    /// 去掉未被引用的顶点
    pub fn compacted(&self) -> Self {
        self.submesh(0..self.faces.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::box_mesh;

    #[test]
    fn test_from_parts_rejects_bad_index() {
        let result = TriMesh::from_parts(vec![Point3D::ZERO; 2], vec![[0, 1, 2]]);
        assert!(matches!(result, Err(MeshError::InvalidTopology { .. })));
    }

    #[test]
    fn test_translated_bbox() {
        let mesh = box_mesh(Point3D::ZERO, Point3D::new(1.0, 2.0, 3.0));
        let moved = mesh.translated(Point3D::new(10.0, 0.0, -1.0));
        let bbox = moved.bbox();
        assert_eq!(bbox.min, Point3D::new(10.0, 0.0, -1.0));
        assert_eq!(bbox.max, Point3D::new(11.0, 2.0, 2.0));
    }

    #[test]
    fn test_submesh_remaps_vertices() {
        let mesh = box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
        let sub = mesh.submesh([0usize, 1]);
        assert_eq!(sub.n_faces(), 2);
        assert_eq!(sub.n_vertices(), 4);
        assert!(sub.faces().iter().flatten().all(|&v| v < 4));
    }

    #[test]
    fn test_compacted_drops_unused_vertices() {
        let mut mesh = box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
        mesh.add_vertex(Point3D::new(9.0, 9.0, 9.0));
        assert_eq!(mesh.n_vertices(), 9);
        let compact = mesh.compacted();
        assert_eq!(compact.n_vertices(), 8);
        assert_eq!(compact.bbox(), mesh.bbox());
    }

    #[test]
    fn test_append() {
        let a = box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
        let mut b = a.clone();
        b.append(&a.translated(Point3D::new(5.0, 0.0, 0.0)));
        assert_eq!(b.n_faces(), 24);
        assert_eq!(b.bbox().max.x, 6.0);
    }
}
