// crates/aq_mesh/src/triangulate.rs

//! 多边形三角化算法
//!
//! 用于切割截面的封口，支持:
//! - 耳切法 (Ear Clipping) - 简单多边形
//! - 带洞多边形：先用桥接边把每个洞并入外环，再做耳切
//!
//! 共线顶点全部保留。截面环上的每个顶点都是侧面三角形的顶点，
//! 丢弃任何一个都会在封口处留下 T 型接缝，网格不再闭合。

use aq_geo::geometry::{orient2d, Point2D};
use aq_geo::predicates::{point_in_triangle_2d, polygon_signed_area, segments_cross_2d};

/// 三角化器
///
/// 所有多边形都以下标引用同一个点数组，输出三角形同样是该数组的下标，
/// 方向为逆时针。
pub struct Triangulator<'a> {
    points: &'a [Point2D],
}

impl<'a> Triangulator<'a> {
    /// 创建三角化器
    pub fn new(points: &'a [Point2D]) -> Self {
        Self { points }
    }

    /// 三角化简单多边形 (耳切法)
    ///
    /// # 参数
    /// - `polygon`: 多边形顶点下标（任意方向）
    ///
    /// # 返回
    /// 三角形顶点下标列表
    pub fn triangulate_polygon(&self, polygon: &[usize]) -> Vec<[usize; 3]> {
        self.triangulate_with_holes(polygon, &[])
    }

    /// 三角化带洞多边形
    ///
    /// 外环和洞的方向会被自动调整（外环逆时针，洞顺时针）。
    pub fn triangulate_with_holes(&self, outer: &[usize], holes: &[Vec<usize>]) -> Vec<[usize; 3]> {
        if outer.len() < 3 {
            return Vec::new();
        }
        let mut ring = self.oriented(outer, true);

        let mut holes: Vec<Vec<usize>> = holes
            .iter()
            .filter(|h| h.len() >= 3)
            .map(|h| self.oriented(h, false))
            .collect();
        // 按最大 x 从大到小并入
        holes.sort_by(|a, b| self.max_x(b).total_cmp(&self.max_x(a)));

        for k in 0..holes.len() {
            let (current, rest) = holes[k..].split_at(1);
            ring = self.bridge(&ring, &current[0], rest);
        }

        self.ear_clipping(ring)
    }

    fn oriented(&self, polygon: &[usize], ccw: bool) -> Vec<usize> {
        let mut ring = polygon.to_vec();
        if (self.signed_area(&ring) > 0.0) != ccw {
            ring.reverse();
        }
        ring
    }

    fn signed_area(&self, ring: &[usize]) -> f64 {
        let pts: Vec<Point2D> = ring.iter().map(|&i| self.points[i]).collect();
        polygon_signed_area(&pts)
    }

    fn max_x(&self, ring: &[usize]) -> f64 {
        ring.iter()
            .map(|&i| self.points[i].x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// 用一条桥接边把洞并入外环
    fn bridge(&self, ring: &[usize], hole: &[usize], pending: &[Vec<usize>]) -> Vec<usize> {
        let pts = self.points;
        // 洞上 x 最大的顶点
        let m_pos = (0..hole.len())
            .max_by(|&a, &b| {
                let (pa, pb) = (pts[hole[a]], pts[hole[b]]);
                pa.x.total_cmp(&pb.x).then(pb.y.total_cmp(&pa.y))
            })
            .unwrap_or(0);
        let m = pts[hole[m_pos]];

        let mut candidates: Vec<usize> = (0..ring.len()).collect();
        candidates.sort_by(|&a, &b| {
            let (pa, pb) = (pts[ring[a]], pts[ring[b]]);
            (pa.x < m.x)
                .cmp(&(pb.x < m.x))
                .then(pa.distance_squared_to(&m).total_cmp(&pb.distance_squared_to(&m)))
        });

        let visible = |pos: usize| {
            let p = pts[ring[pos]];
            let crosses = |poly: &[usize]| {
                (0..poly.len()).any(|e| {
                    let (a, b) = (pts[poly[e]], pts[poly[(e + 1) % poly.len()]]);
                    segments_cross_2d(m, p, a, b)
                })
            };
            !crosses(ring) && !crosses(hole) && !pending.iter().any(|h| crosses(h))
        };

        let chosen = candidates
            .iter()
            .copied()
            .find(|&pos| self.in_wedge(ring, pos, m) && visible(pos))
            .or_else(|| candidates.first().copied());

        let Some(pos) = chosen else {
            return ring.to_vec();
        };
        if !(self.in_wedge(ring, pos, m) && visible(pos)) {
            tracing::warn!(hole_vertices = hole.len(), "封口桥接边找不到可见顶点，使用最近顶点");
        }

        let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
        merged.extend_from_slice(&ring[..=pos]);
        merged.extend_from_slice(&hole[m_pos..]);
        merged.extend_from_slice(&hole[..=m_pos]);
        merged.extend_from_slice(&ring[pos..]);
        merged
    }

    /// 方向 `p_pos -> target` 是否落在逆时针环在该顶点处的内角内
    fn in_wedge(&self, ring: &[usize], pos: usize, target: Point2D) -> bool {
        let n = ring.len();
        let a = self.points[ring[(pos + n - 1) % n]];
        let b = self.points[ring[pos]];
        let c = self.points[ring[(pos + 1) % n]];
        if b == target {
            return true;
        }
        let left_of_in = orient2d(a, b, target) >= 0.0;
        let left_of_out = orient2d(b, c, target) >= 0.0;
        if orient2d(a, b, c) >= 0.0 {
            left_of_in && left_of_out
        } else {
            left_of_in || left_of_out
        }
    }

    /// 耳切法实现
    fn ear_clipping(&self, mut remaining: Vec<usize>) -> Vec<[usize; 3]> {
        let mut triangles = Vec::with_capacity(remaining.len().saturating_sub(2));
        let mut start = 0;

        while remaining.len() > 3 {
            let len = remaining.len();
            let ear = (0..len)
                .map(|k| (start + k) % len)
                .find(|&i| self.is_ear(&remaining, i, true))
                .or_else(|| (0..len).find(|&i| self.is_ear(&remaining, i, false)));

            match ear {
                Some(i) => {
                    let prev = remaining[(i + len - 1) % len];
                    let next = remaining[(i + 1) % len];
                    triangles.push([prev, remaining[i], next]);
                    remaining.remove(i);
                    start = if i == 0 { 0 } else { i - 1 };
                }
                None => {
                    tracing::warn!(vertices = len, "耳切法未找到耳朵，剩余部分按扇形三角化");
                    break;
                }
            }
        }

        if remaining.len() == 3 {
            triangles.push([remaining[0], remaining[1], remaining[2]]);
        } else if remaining.len() > 3 {
            for k in 1..remaining.len() - 1 {
                triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
            }
        }

        triangles.retain(|t| t[0] != t[1] && t[1] != t[2] && t[2] != t[0]);
        triangles
    }

    /// 检查是否为耳朵
    ///
    /// `strict` 为假时只要求凸角，不检查其他顶点是否落入三角形。
    fn is_ear(&self, ring: &[usize], i: usize, strict: bool) -> bool {
        let len = ring.len();
        let (ip, ic, inx) = (ring[(i + len - 1) % len], ring[i], ring[(i + 1) % len]);
        if ip == ic || ic == inx || ip == inx {
            return false;
        }
        let (a, b, c) = (self.points[ip], self.points[ic], self.points[inx]);

        // 检查是否凸角 (逆时针方向的凸角叉积为正)
        if orient2d(a, b, c) <= 0.0 {
            return false;
        }
        if !strict {
            return true;
        }

        // 检查是否有其他点在三角形内（含边界）；与角点重合的桥接副本除外
        ring.iter().all(|&k| {
            let p = self.points[k];
            k == ip
                || k == ic
                || k == inx
                || p == a
                || p == b
                || p == c
                || !point_in_triangle_2d(p, a, b, c)
        })
    }
}
