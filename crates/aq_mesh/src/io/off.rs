// crates/aq_mesh/src/io/off.rs

//! OFF 文本格式
//!
//! ```text
//! OFF
//! # 注释
//! <顶点数> <面数> <边数>
//! x y z            （每个顶点一行）
//! 3 i j k          （每个面一行，只支持三角形）
//! ```
//!
//! 计数行可以与 `OFF` 写在同一行。顶点行和面行中多余的列（颜色等）被忽略。

use std::fmt::Write as _;

use aq_geo::Point3D;

use crate::error::{MeshError, MeshResult};
use crate::trimesh::TriMesh;

/// OFF 文件头
pub const OFF_MAGIC: &str = "OFF";

const FORMAT: &str = "OFF";

/// 解析 OFF 文本
pub fn read_off(text: &str) -> MeshResult<TriMesh> {
    // (行号, 内容)，跳过空行和注释
    let mut lines = text.lines().enumerate().filter_map(|(i, line)| {
        let content = line.split('#').next().unwrap_or("").trim();
        (!content.is_empty()).then_some((i + 1, content))
    });

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| MeshError::format_error(FORMAT, 1, "文件为空"))?;
    let rest = header
        .strip_prefix(OFF_MAGIC)
        .ok_or_else(|| MeshError::format_error(FORMAT, header_line, "缺少 OFF 文件头"))?;

    let (count_line, counts) = if rest.trim().is_empty() {
        lines
            .next()
            .ok_or_else(|| MeshError::format_error(FORMAT, header_line, "缺少计数行"))?
    } else {
        (header_line, rest.trim())
    };
    let counts: Vec<usize> = counts
        .split_whitespace()
        .map(|t| t.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| MeshError::format_error(FORMAT, count_line, format!("计数无效: {e}")))?;
    let (n_vertices, n_faces) = match counts.as_slice() {
        [nv, nf, ..] => (*nv, *nf),
        _ => {
            return Err(MeshError::format_error(FORMAT, count_line, "计数行至少需要顶点数和面数"))
        }
    };
    if n_vertices == 0 || n_faces == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let mut mesh = TriMesh::new();
    for _ in 0..n_vertices {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| MeshError::format_error(FORMAT, 0, "顶点数据不足"))?;
        let coords: Vec<f64> = line
            .split_whitespace()
            .take(3)
            .map(|t| t.parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| MeshError::format_error(FORMAT, line_no, format!("顶点坐标无效: {e}")))?;
        let [x, y, z] = coords[..] else {
            return Err(MeshError::format_error(FORMAT, line_no, "顶点需要 3 个坐标"));
        };
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(MeshError::format_error(FORMAT, line_no, "顶点坐标不是有限值"));
        }
        mesh.add_vertex(Point3D::new(x, y, z));
    }

    for _ in 0..n_faces {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| MeshError::format_error(FORMAT, 0, "面数据不足"))?;
        let mut tokens = line.split_whitespace();
        let arity: usize = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| MeshError::format_error(FORMAT, line_no, "面顶点数无效"))?;
        if arity != 3 {
            return Err(MeshError::format_error(
                FORMAT,
                line_no,
                format!("只支持三角形面，实际为 {arity} 边形"),
            ));
        }
        let mut tri = [0u32; 3];
        for slot in &mut tri {
            let v: u32 = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| MeshError::format_error(FORMAT, line_no, "面顶点索引无效"))?;
            if v as usize >= n_vertices {
                return Err(MeshError::format_error(
                    FORMAT,
                    line_no,
                    format!("顶点索引 {v} 超出范围 0..{n_vertices}"),
                ));
            }
            *slot = v;
        }
        mesh.add_face(tri);
    }

    Ok(mesh)
}

/// 写出 OFF 文本，坐标保留 `precision` 位小数
pub fn write_off(mesh: &TriMesh, precision: usize) -> String {
    let mut out = String::with_capacity(32 + mesh.n_vertices() * 40 + mesh.n_faces() * 16);
    // String 的 fmt::Write 不会失败
    let _ = writeln!(out, "{OFF_MAGIC}");
    let _ = writeln!(out, "{} {} 0", mesh.n_vertices(), mesh.n_faces());
    for p in mesh.vertices() {
        let _ = writeln!(out, "{:.*} {:.*} {:.*}", precision, p.x, precision, p.y, precision, p.z);
    }
    for [a, b, c] in mesh.faces() {
        let _ = writeln!(out, "3 {a} {b} {c}");
    }
    out
}
