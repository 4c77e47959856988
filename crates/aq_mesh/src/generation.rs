// crates/aq_mesh/src/generation.rs

//! 网格生成模块
//!
//! 提供简单的闭合网格生成工具，用于测试和验证：
//!
//! - [`box_mesh`]: 轴对齐长方体（8 顶点 12 三角形）
//! - [`hollow_box`]: 带内腔的长方体（外壳朝外、内腔壳朝内）
//! - [`tetrahedron`]: 单位四面体
//! - [`BoxMeshGenerator`]: 每个面细分为 n×n 网格的长方体
//!
//! # 使用示例
//!
//! ```rust
//! use aq_geo::Point3D;
//! use aq_mesh::generation::BoxMeshGenerator;
//!
//! let mesh = BoxMeshGenerator::new(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0), 4).build();
//! assert_eq!(mesh.n_faces(), 6 * 4 * 4 * 2);
//! ```

use std::collections::HashMap;

use aq_geo::Point3D;

use crate::trimesh::TriMesh;

/// 长方体各面的三角形（顶点编号 `i + 2j + 4k`，法向朝外）
const BOX_FACES: [[u32; 3]; 12] = [
    [0, 2, 3],
    [0, 3, 1], // z-
    [4, 5, 7],
    [4, 7, 6], // z+
    [0, 1, 5],
    [0, 5, 4], // y-
    [2, 6, 7],
    [2, 7, 3], // y+
    [0, 4, 6],
    [0, 6, 2], // x-
    [1, 3, 7],
    [1, 7, 5], // x+
];

/// 轴对齐长方体
pub fn box_mesh(min: Point3D, max: Point3D) -> TriMesh {
    let mut mesh = TriMesh::new();
    for k in 0..2 {
        for j in 0..2 {
            for i in 0..2 {
                mesh.add_vertex(Point3D::new(
                    if i == 0 { min.x } else { max.x },
                    if j == 0 { min.y } else { max.y },
                    if k == 0 { min.z } else { max.z },
                ));
            }
        }
    }
    for tri in BOX_FACES {
        mesh.add_face(tri);
    }
    mesh
}

/// 带内腔的长方体
///
/// 外壳法向朝外，内腔壳法向朝向内腔中心。两层壳之间没有共享边，
/// 按边连通时是两个分量。
pub fn hollow_box(
    outer_min: Point3D,
    outer_max: Point3D,
    inner_min: Point3D,
    inner_max: Point3D,
) -> TriMesh {
    let mut mesh = box_mesh(outer_min, outer_max);
    mesh.append(&box_mesh(inner_min, inner_max).flipped());
    mesh
}

/// 单位四面体 (0,0,0)-(1,0,0)-(0,1,0)-(0,0,1)
pub fn tetrahedron() -> TriMesh {
    let vertices = vec![
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, 1.0, 0.0),
        Point3D::new(0.0, 0.0, 1.0),
    ];
    let faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
    let mut mesh = TriMesh::new();
    for v in vertices {
        mesh.add_vertex(v);
    }
    for f in faces {
        mesh.add_face(f);
    }
    mesh
}

/// 细分长方体生成器
///
/// 每个面划分为 `n × n` 个四边形，再各拆成两个三角形。
/// 相邻面共享棱上的顶点，结果是闭合流形。
pub struct BoxMeshGenerator {
    min: Point3D,
    max: Point3D,
    n: usize,
}

impl BoxMeshGenerator {
    /// 创建生成器，`n` 至少为 1
    pub fn new(min: Point3D, max: Point3D, n: usize) -> Self {
        Self {
            min,
            max,
            n: n.max(1),
        }
    }

    /// 顶点数
    pub fn n_vertices(&self) -> usize {
        let n = self.n;
        6 * n * n + 2
    }

    /// 生成网格
    pub fn build(&self) -> TriMesh {
        let n = self.n;
        // (法向轴, 固定格点, u 轴, v 轴)，u × v 为外法向
        let sides: [(usize, usize, usize); 6] = [(2, 1, 0), (2, 0, 1), (1, 0, 2), (1, 2, 0), (0, 2, 1), (0, 1, 2)];
        let fixed = [0, n, 0, n, 0, n];

        let mut mesh = TriMesh::new();
        let mut lookup: HashMap<[usize; 3], u32> = HashMap::with_capacity(self.n_vertices());

        for (side, &(axis, u_axis, v_axis)) in sides.iter().enumerate() {
            let mut vertex = |a: usize, b: usize| -> u32 {
                let mut lattice = [0usize; 3];
                lattice[axis] = fixed[side];
                lattice[u_axis] = a;
                lattice[v_axis] = b;
                *lookup
                    .entry(lattice)
                    .or_insert_with(|| mesh.add_vertex(self.lattice_point(lattice)))
            };
            let mut quads = Vec::with_capacity(n * n);
            for a in 0..n {
                for b in 0..n {
                    quads.push([vertex(a, b), vertex(a + 1, b), vertex(a + 1, b + 1), vertex(a, b + 1)]);
                }
            }
            for [p00, p10, p11, p01] in quads {
                mesh.add_face([p00, p10, p11]);
                mesh.add_face([p00, p11, p01]);
            }
        }
        mesh
    }

    fn lattice_point(&self, lattice: [usize; 3]) -> Point3D {
        let t = |i: usize| i as f64 / self.n as f64;
        Point3D::new(
            self.min.x + (self.max.x - self.min.x) * t(lattice[0]),
            self.min.y + (self.max.y - self.min.y) * t(lattice[1]),
            self.min.z + (self.max.z - self.min.z) * t(lattice[2]),
        )
    }
}
