// crates/aq_mesh/src/clip.rs

//! 半空间裁剪
//!
//! 保留平面 `signed_distance <= 0` 一侧的部分，并用平面内的封口面
//! 把切开的洞重新封闭，使闭合网格裁剪后仍然闭合。
//!
//! # 算法
//!
//! 1. 按有向距离给顶点分类，`|d| <= eps` 的顶点视为落在平面上
//! 2. 逐三角形做 Sutherland–Hodgman 裁剪；跨越平面的边只生成一个交点，
//!    按无向边缓存，相邻三角形共享
//! 3. 完全落在平面上的面，法向与平面法向同向时保留（它是保留体的顶面）
//! 4. 没有反向配对的半边构成截面边界，反向后串成封口环
//! 5. 封口环投影到平面基底：正面积为外环，负面积为洞；每个洞归入
//!    包含它的最小外环，再做带洞耳切

use std::collections::{BTreeMap, HashMap, HashSet};

use aq_geo::{Plane, Point2D, Point3D};
use aq_geo::predicates::{point_in_polygon, polygon_signed_area};

use crate::triangulate::Triangulator;
use crate::trimesh::TriMesh;
use crate::validate::directed_edge_counts;

/// 把网格裁剪到平面下方
///
/// - `close_holes`: 是否生成封口面
/// - `eps`: 绝对容差，用于判定顶点是否落在平面上
///
/// 全部在平面下方（含平面上）时返回原网格副本；没有任何部分
/// 严格位于下方时返回空网格。
pub fn clip_to_half_space(mesh: &TriMesh, plane: &Plane, close_holes: bool, eps: f64) -> TriMesh {
    let side: Vec<f64> = mesh
        .vertices()
        .iter()
        .map(|p| {
            let d = plane.signed_distance(p);
            if d.abs() <= eps {
                0.0
            } else {
                d
            }
        })
        .collect();

    let referenced: HashSet<u32> = mesh.faces().iter().flatten().copied().collect();
    let any_above = referenced.iter().any(|&v| side[v as usize] > 0.0);
    let any_below = referenced.iter().any(|&v| side[v as usize] < 0.0);
    if !any_above {
        return mesh.clone();
    }
    if !any_below {
        return TriMesh::new();
    }

    let mut out = Clipper {
        vertices: mesh.vertices().to_vec(),
        faces: Vec::with_capacity(mesh.n_faces()),
        crossings: HashMap::new(),
        plane,
    };

    for (f, &tri) in mesh.faces().iter().enumerate() {
        let s = tri.map(|v| side[v as usize]);
        if s.iter().all(|&d| d <= 0.0) {
            if s.iter().all(|&d| d == 0.0) {
                // 平面上的面：只保留朝向被切除一侧的
                if mesh.face_normal(f).dot(&plane.normal) > 0.0 {
                    out.faces.push(tri);
                }
            } else {
                out.faces.push(tri);
            }
            continue;
        }
        if s.iter().all(|&d| d >= 0.0) {
            continue;
        }

        // Sutherland–Hodgman
        let mut polygon: Vec<u32> = Vec::with_capacity(4);
        for i in 0..3 {
            let (a, b) = (tri[i], tri[(i + 1) % 3]);
            let (sa, sb) = (s[i], s[(i + 1) % 3]);
            if sa <= 0.0 {
                polygon.push(a);
            }
            if (sa < 0.0 && sb > 0.0) || (sa > 0.0 && sb < 0.0) {
                polygon.push(out.crossing(a, b, sa, sb));
            }
        }
        for k in 1..polygon.len().saturating_sub(1) {
            let t = [polygon[0], polygon[k], polygon[k + 1]];
            if t[0] != t[1] && t[1] != t[2] && t[2] != t[0] {
                out.faces.push(t);
            }
        }
    }

    if close_holes {
        out.close_cut();
    }

    let clipped = TriMesh::from_parts(out.vertices, out.faces).unwrap_or_default();
    clipped.compacted()
}

struct Clipper<'a> {
    vertices: Vec<Point3D>,
    faces: Vec<[u32; 3]>,
    crossings: HashMap<(u32, u32), u32>,
    plane: &'a Plane,
}

impl Clipper<'_> {
    /// 边 (a, b) 与平面的交点，按无向边缓存
    fn crossing(&mut self, a: u32, b: u32, sa: f64, sb: f64) -> u32 {
        let (key, s_lo, s_hi) = if a < b { ((a, b), sa, sb) } else { ((b, a), sb, sa) };
        if let Some(&v) = self.crossings.get(&key) {
            return v;
        }
        let (p, q) = (self.vertices[key.0 as usize], self.vertices[key.1 as usize]);
        let t = s_lo / (s_lo - s_hi);
        let x = p.lerp(&q, t);
        let x = x - self.plane.normal * self.plane.signed_distance(&x);
        let v = self.vertices.len() as u32;
        self.vertices.push(x);
        self.crossings.insert(key, v);
        v
    }

    /// 为截面生成封口面
    fn close_cut(&mut self) {
        let loops = self.boundary_loops();
        if loops.is_empty() {
            return;
        }

        let (u, v) = self.plane.basis();
        let origin = self.plane.origin;
        let project = |p: &Point3D| {
            let d = *p - origin;
            Point2D::new(d.dot(&u), d.dot(&v))
        };

        let projected: Vec<Vec<Point2D>> = loops
            .iter()
            .map(|l| l.iter().map(|&i| project(&self.vertices[i as usize])).collect())
            .collect();
        let areas: Vec<f64> = projected.iter().map(|p| polygon_signed_area(p)).collect();

        let outers: Vec<usize> = (0..loops.len()).filter(|&i| areas[i] > 0.0).collect();
        let mut holes_of: Vec<Vec<usize>> = vec![Vec::new(); outers.len()];
        for h in (0..loops.len()).filter(|&i| areas[i] < 0.0) {
            let probe = midpoint(&projected[h]);
            let owner = outers
                .iter()
                .enumerate()
                .filter(|(_, &o)| point_in_polygon(&probe, &projected[o]))
                .min_by(|(_, &a), (_, &b)| areas[a].total_cmp(&areas[b]))
                .map(|(k, _)| k);
            match owner {
                Some(k) => holes_of[k].push(h),
                None => tracing::warn!(vertices = loops[h].len(), "截面内环不在任何外环内，已忽略"),
            }
        }

        for (k, &o) in outers.iter().enumerate() {
            let mut points = Vec::new();
            let mut ids = Vec::new();
            let mut push_loop = |l: usize| -> Vec<usize> {
                let start = points.len();
                points.extend_from_slice(&projected[l]);
                ids.extend_from_slice(&loops[l]);
                (start..points.len()).collect()
            };
            let outer = push_loop(o);
            let holes: Vec<Vec<usize>> = holes_of[k].iter().map(|&h| push_loop(h)).collect();

            let triangles = Triangulator::new(&points).triangulate_with_holes(&outer, &holes);
            for [a, b, c] in triangles {
                let t = [ids[a], ids[b], ids[c]];
                if t[0] != t[1] && t[1] != t[2] && t[2] != t[0] {
                    self.faces.push(t);
                }
            }
        }
    }

    /// 截面边界环（已反向，从被切除一侧看为逆时针）
    fn boundary_loops(&self) -> Vec<Vec<u32>> {
        let counts = directed_edge_counts(&self.faces);
        // 封口边是边界半边的反向
        let mut cap_edges: Vec<(u32, u32)> = counts
            .keys()
            .filter(|&&(a, b)| !counts.contains_key(&(b, a)))
            .map(|&(a, b)| (b, a))
            .collect();
        cap_edges.sort_unstable();

        let mut outgoing: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for &(a, b) in &cap_edges {
            outgoing.entry(a).or_default().push(b);
        }

        let mut used: HashSet<(u32, u32)> = HashSet::with_capacity(cap_edges.len());
        let mut loops = Vec::new();
        for &(start, first) in &cap_edges {
            if !used.insert((start, first)) {
                continue;
            }
            let mut ring = vec![start];
            let mut current = first;
            let mut closed = true;
            while current != start {
                ring.push(current);
                let next = outgoing
                    .get(&current)
                    .and_then(|targets| targets.iter().copied().find(|&t| !used.contains(&(current, t))));
                match next {
                    Some(t) => {
                        used.insert((current, t));
                        current = t;
                    }
                    None => {
                        closed = false;
                        break;
                    }
                }
            }
            if closed && ring.len() >= 3 {
                loops.push(ring);
            } else {
                tracing::warn!(vertices = ring.len(), "截面边界未闭合，跳过该环");
            }
        }
        loops
    }
}

/// 环上第一条边的中点，用于判断洞属于哪个外环
fn midpoint(ring: &[Point2D]) -> Point2D {
    match ring {
        [a, b, ..] => (*a + *b) * 0.5,
        [a] => *a,
        [] => Point2D::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{box_mesh, hollow_box, tetrahedron, BoxMeshGenerator};
    use crate::measure::signed_volume;
    use crate::topology::connected_components;
    use crate::validate::is_closed_manifold;

    const EPS: f64 = 1e-9;

    fn unit_box() -> TriMesh {
        box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_box_cut_in_half() {
        let clipped = clip_to_half_space(&unit_box(), &Plane::horizontal(0.5), true, EPS);
        assert!(is_closed_manifold(&clipped));
        assert!((signed_volume(&clipped) - 0.5).abs() < 1e-12);
        let bbox = clipped.bbox();
        assert!((bbox.max.z - 0.5).abs() < 1e-12);
        assert_eq!(bbox.min.z, 0.0);
    }

    #[test]
    fn test_plane_above_returns_copy() {
        let mesh = unit_box();
        assert_eq!(clip_to_half_space(&mesh, &Plane::horizontal(2.0), true, EPS), mesh);
        // 顶面恰好在平面上
        assert_eq!(clip_to_half_space(&mesh, &Plane::horizontal(1.0), true, EPS), mesh);
    }

    #[test]
    fn test_plane_below_returns_empty() {
        let mesh = unit_box();
        assert!(clip_to_half_space(&mesh, &Plane::horizontal(-1.0), true, EPS).is_empty());
        // 底面恰好在平面上，没有体积剩余
        assert!(clip_to_half_space(&mesh, &Plane::horizontal(0.0), true, EPS).is_empty());
    }

    #[test]
    fn test_open_cut_without_caps() {
        let clipped = clip_to_half_space(&unit_box(), &Plane::horizontal(0.5), false, EPS);
        assert!(!clipped.is_empty());
        assert!(!is_closed_manifold(&clipped));
    }

    #[test]
    fn test_cut_through_vertex_row() {
        // 4×4 细分，z = 0.5 正好穿过一排顶点
        let mesh = BoxMeshGenerator::new(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0), 4).build();
        let clipped = clip_to_half_space(&mesh, &Plane::horizontal(0.5), true, EPS);
        assert!(is_closed_manifold(&clipped));
        assert!((signed_volume(&clipped) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tetrahedron_tip() {
        let clipped = clip_to_half_space(&tetrahedron(), &Plane::horizontal(0.5), true, EPS);
        assert!(is_closed_manifold(&clipped));
        // 去掉高 0.5 的相似小四面体：1/6 - 1/48
        let expected = 1.0 / 6.0 - 1.0 / 48.0;
        assert!((signed_volume(&clipped) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_hollow_box_annulus_cap() {
        let mesh = hollow_box(
            Point3D::new(-1.0, -1.0, -1.0),
            Point3D::new(1.0, 1.0, 1.0),
            Point3D::new(-0.5, -0.5, -0.5),
            Point3D::new(0.5, 0.5, 0.5),
        );
        let clipped = clip_to_half_space(&mesh, &Plane::horizontal(0.0), true, EPS);
        assert!(is_closed_manifold(&clipped));
        // 外壳下半 4 减内腔下半 0.5
        assert!((signed_volume(&clipped) - 3.5).abs() < 1e-12);
        // 环形封口把两层壳连成一个分量
        assert_eq!(connected_components(&clipped).len(), 1);
    }

    #[test]
    fn test_disjoint_parts_stay_separate() {
        // 两个互不相连的长方体，只有上面一个被切开
        let mut mesh = box_mesh(Point3D::ZERO, Point3D::new(3.0, 1.0, 1.0));
        mesh.append(&box_mesh(Point3D::new(0.0, 0.0, 2.0), Point3D::new(1.0, 1.0, 3.0)));
        let clipped = clip_to_half_space(&mesh, &Plane::horizontal(2.5), true, EPS);
        assert!(is_closed_manifold(&clipped));
        assert_eq!(connected_components(&clipped).len(), 2);
        assert!((signed_volume(&clipped) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_inclined_plane() {
        let plane = Plane::new(Point3D::new(0.5, 0.5, 0.5), Point3D::new(1.0, 0.0, 1.0)).unwrap();
        let clipped = clip_to_half_space(&unit_box(), &plane, true, EPS);
        assert!(is_closed_manifold(&clipped));
        assert!((signed_volume(&clipped) - 0.5).abs() < 1e-12);
    }
}
