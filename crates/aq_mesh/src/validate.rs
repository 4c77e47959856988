// crates/aq_mesh/src/validate.rs

//! 网格拓扑验证
//!
//! 闭合二维流形的判据：
//!
//! - 所有顶点坐标为有限值，所有面索引有效且不重复
//! - 每条有向边恰好出现一次，且其反向边也恰好出现一次
//!
//! 第二条同时保证了无边界、每条边恰好两个面、相邻面方向一致。

use std::collections::HashMap;

use aq_foundation::validation::{ValidationError, ValidationReport, ValidationWarning};

use crate::measure::signed_volume;
use crate::topology::component_labels;
use crate::trimesh::TriMesh;

/// 有向边出现次数
pub(crate) fn directed_edge_counts(faces: &[[u32; 3]]) -> HashMap<(u32, u32), usize> {
    let mut counts = HashMap::with_capacity(faces.len() * 3);
    for &[a, b, c] in faces {
        for e in [(a, b), (b, c), (c, a)] {
            *counts.entry(e).or_insert(0) += 1;
        }
    }
    counts
}

/// 生成完整验证报告
pub fn validate_mesh(mesh: &TriMesh) -> ValidationReport {
    let mut report = ValidationReport::new();

    if mesh.is_empty() {
        report.add_error(ValidationError::EmptyMesh);
        return report;
    }

    for (i, p) in mesh.vertices().iter().enumerate() {
        if !p.is_finite() {
            report.add_error(ValidationError::NonFiniteVertex { vertex: i });
        }
    }

    let n = mesh.n_vertices();
    let mut referenced = vec![false; n];
    let mut indices_ok = true;
    for (f, tri) in mesh.faces().iter().enumerate() {
        for &v in tri {
            if v as usize >= n {
                report.add_error(ValidationError::InvalidVertexIndex {
                    face: f,
                    vertex: v as usize,
                    len: n,
                });
                indices_ok = false;
            } else {
                referenced[v as usize] = true;
            }
        }
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[2] == tri[0] {
            report.add_error(ValidationError::DegenerateFace { face: f });
        }
    }

    let counts = directed_edge_counts(mesh.faces());
    let mut edges: Vec<_> = counts.iter().collect();
    edges.sort_unstable();
    for (&(from, to), &count) in edges {
        if from == to {
            continue;
        }
        if count > 1 {
            report.add_error(ValidationError::NonManifoldEdge {
                from: from as usize,
                to: to as usize,
                count,
            });
        }
        if !counts.contains_key(&(to, from)) {
            report.add_error(ValidationError::BoundaryEdge {
                from: from as usize,
                to: to as usize,
            });
        }
    }

    for (v, used) in referenced.iter().enumerate() {
        if !used {
            report.add_warning(ValidationWarning::IsolatedVertex { vertex: v });
        }
    }

    if indices_ok {
        let (_, count) = component_labels(mesh);
        if count > 1 {
            report.add_warning(ValidationWarning::MultipleComponents { count });
        }
        if report.is_valid() {
            let volume = signed_volume(mesh);
            if volume < 0.0 {
                report.add_warning(ValidationWarning::InvertedOrientation { volume });
            }
        }
    }

    report
}

/// 网格是否为闭合二维流形
pub fn is_closed_manifold(mesh: &TriMesh) -> bool {
    if mesh.is_empty() {
        return false;
    }
    let n = mesh.n_vertices() as u32;
    if !mesh.vertices().iter().all(|p| p.is_finite()) {
        return false;
    }
    let faces_ok = mesh.faces().iter().all(|&[a, b, c]| {
        a < n && b < n && c < n && a != b && b != c && c != a
    });
    if !faces_ok {
        return false;
    }
    let counts = directed_edge_counts(mesh.faces());
    counts
        .iter()
        .all(|(&(from, to), &count)| count == 1 && counts.get(&(to, from)) == Some(&1))
}
