// crates/aq_mesh/src/topology.rs

//! 连通分量
//!
//! 两个面共享一条边即视为相连（只共享顶点不算）。分量按其最小面索引
//! 排序编号，保证同一输入总是得到相同的分量顺序。

use std::collections::HashMap;

use crate::trimesh::{FaceIndex, TriMesh};

/// 并查集
struct DisjointSet {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let p = self.parent[x as usize];
            self.parent[x as usize] = self.parent[p as usize];
            x = p;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => self.parent[ra as usize] = rb,
            std::cmp::Ordering::Greater => self.parent[rb as usize] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb as usize] = ra;
                self.rank[ra as usize] += 1;
            }
        }
    }
}

/// 每个面的分量编号及分量总数
pub fn component_labels(mesh: &TriMesh) -> (Vec<u32>, usize) {
    let n_faces = mesh.n_faces();
    let mut dsu = DisjointSet::new(n_faces);
    let mut first_face_of_edge: HashMap<(u32, u32), u32> = HashMap::with_capacity(n_faces * 2);

    for (f, &[a, b, c]) in mesh.faces().iter().enumerate() {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let key = if u < v { (u, v) } else { (v, u) };
            match first_face_of_edge.get(&key) {
                Some(&g) => dsu.union(f as u32, g),
                None => {
                    first_face_of_edge.insert(key, f as u32);
                }
            }
        }
    }

    let mut root_label: HashMap<u32, u32> = HashMap::new();
    let labels: Vec<u32> = (0..n_faces as u32)
        .map(|f| {
            let root = dsu.find(f);
            let next = root_label.len() as u32;
            *root_label.entry(root).or_insert(next)
        })
        .collect();
    let count = root_label.len();
    (labels, count)
}

/// 按边连通拆分为多个网格
pub fn connected_components(mesh: &TriMesh) -> Vec<TriMesh> {
    let (labels, count) = component_labels(mesh);
    if count <= 1 {
        return if mesh.is_empty() {
            Vec::new()
        } else {
            vec![mesh.compacted()]
        };
    }
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (f, &label) in labels.iter().enumerate() {
        groups[label as usize].push(f);
    }
    groups.into_iter().map(|faces| mesh.submesh(faces)).collect()
}

/// 只保留包含指定面的分量
///
/// 面索引越界时返回空网格。
pub fn keep_component_containing(mesh: &TriMesh, face: FaceIndex) -> TriMesh {
    if !face.is_valid() || face.as_usize() >= mesh.n_faces() {
        return TriMesh::new();
    }
    let (labels, _) = component_labels(mesh);
    let target = labels[face.as_usize()];
    mesh.submesh(
        labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == target)
            .map(|(f, _)| f),
    )
}
