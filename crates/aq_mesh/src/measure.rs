// crates/aq_mesh/src/measure.rs

//! 网格度量：体积与表面积

use crate::trimesh::TriMesh;

/// 有向体积
///
/// 对每个三角形与原点构成的四面体求有向体积之和。闭合且法向朝外的
/// 网格结果为正；法向朝内的壳（例如内腔）结果为负。
pub fn signed_volume(mesh: &TriMesh) -> f64 {
    // 以包围盒中心为参考点，减小远离原点时的舍入误差
    let bbox = mesh.bbox();
    if bbox.is_empty() {
        return 0.0;
    }
    let c = bbox.center();
    mesh.triangles()
        .map(|[a, b, d]| {
            let (a, b, d) = (a - c, b - c, d - c);
            a.dot(&b.cross(&d))
        })
        .sum::<f64>()
        / 6.0
}

/// 表面积
pub fn surface_area(mesh: &TriMesh) -> f64 {
    (0..mesh.n_faces())
        .map(|f| 0.5 * mesh.face_normal(f).length())
        .sum()
}
