// crates/aq_geo/src/predicates.rs

//! 几何谓词
//!
//! 三角形相交、最近点和二维多边形判定。所有判定都带绝对容差 `eps`：
//! 距离不超过 `eps` 的两个元素视为接触，接触计为相交。
//!
//! 三角形相交归结为"一个三角形的某条边与另一个三角形的距离不超过 `eps`"。
//! 两个三角形之间的最短距离总在其中一个三角形的边上取得，
//! 共面重叠和完全包含的情况也由边与三角形的距离覆盖。

use crate::geometry::{orient2d, Point2D, Point3D};

/// 三角形顶点
pub type Triangle = [Point3D; 3];

// ============================================================================
// 最近点
// ============================================================================

/// 点到三角形的最近点
///
/// 按 Voronoi 区域逐一判定。退化三角形（面积为零）退化为对三条边求最近点。
#[must_use]
pub fn closest_point_on_triangle(p: &Point3D, tri: &Triangle) -> Point3D {
    let [a, b, c] = *tri;
    let ab = b - a;
    let ac = c - a;
    let ap = *p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = *p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let t = d1 / (d1 - d3);
        return a + ab * t;
    }

    let cp = *p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let t = d2 / (d2 - d6);
        return a + ac * t;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let t = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * t;
    }

    let sum = va + vb + vc;
    if sum.abs() <= f64::MIN_POSITIVE || !sum.is_finite() {
        // 退化三角形
        return [(a, b), (b, c), (c, a)]
            .into_iter()
            .map(|(s, e)| closest_point_on_segment(p, &s, &e))
            .min_by(|x, y| x.distance_squared(p).total_cmp(&y.distance_squared(p)))
            .unwrap_or(a);
    }
    let v = vb / sum;
    let w = vc / sum;
    a + ab * v + ac * w
}

/// 点到三角形距离的平方
#[inline]
#[must_use]
pub fn point_triangle_distance_squared(p: &Point3D, tri: &Triangle) -> f64 {
    closest_point_on_triangle(p, tri).distance_squared(p)
}

/// 点到线段的最近点
#[must_use]
pub fn closest_point_on_segment(p: &Point3D, a: &Point3D, b: &Point3D) -> Point3D {
    let ab = *b - *a;
    let len2 = ab.length_squared();
    if len2 <= f64::MIN_POSITIVE {
        return *a;
    }
    let t = ((*p - *a).dot(&ab) / len2).clamp(0.0, 1.0);
    *a + ab * t
}

/// 两条线段之间最短距离的平方
#[must_use]
pub fn segment_segment_distance_squared(
    p1: &Point3D,
    q1: &Point3D,
    p2: &Point3D,
    q2: &Point3D,
) -> f64 {
    let d1 = *q1 - *p1;
    let d2 = *q2 - *p2;
    let r = *p1 - *p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(&r);

    let tiny = f64::MIN_POSITIVE;
    let (s, t) = if a <= tiny && e <= tiny {
        (0.0, 0.0)
    } else if a <= tiny {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= tiny {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let mut s = if denom > tiny {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let c1 = *p1 + d1 * s;
    let c2 = *p2 + d2 * t;
    c1.distance_squared(&c2)
}

// ============================================================================
// 相交判定
// ============================================================================

/// 线段是否在容差 `eps` 内触及三角形
#[must_use]
pub fn segment_touches_triangle(p: &Point3D, q: &Point3D, tri: &Triangle, eps: f64) -> bool {
    let eps2 = eps * eps;
    let [a, b, c] = *tri;

    // 线段穿过三角形所在平面
    if let Some(n) = (b - a).cross(&(c - a)).normalize() {
        let dp = (*p - a).dot(&n);
        let dq = (*q - a).dot(&n);
        if (dp > eps && dq < -eps) || (dp < -eps && dq > eps) {
            let t = dp / (dp - dq);
            let x = p.lerp(q, t);
            if point_triangle_distance_squared(&x, tri) <= eps2 {
                return true;
            }
        }
    }

    if point_triangle_distance_squared(p, tri) <= eps2
        || point_triangle_distance_squared(q, tri) <= eps2
    {
        return true;
    }

    [(a, b), (b, c), (c, a)]
        .iter()
        .any(|(s, e)| segment_segment_distance_squared(p, q, s, e) <= eps2)
}

/// 两个三角形是否相交（接触计为相交）
#[must_use]
pub fn triangles_intersect(t1: &Triangle, t2: &Triangle, eps: f64) -> bool {
    let edges_hit = |src: &Triangle, dst: &Triangle| {
        (0..3).any(|i| segment_touches_triangle(&src[i], &src[(i + 1) % 3], dst, eps))
    };
    edges_hit(t1, t2) || edges_hit(t2, t1)
}

// ============================================================================
// 二维多边形
// ============================================================================

/// 多边形有向面积（逆时针为正）
#[must_use]
pub fn polygon_signed_area(poly: &[Point2D]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let sum: f64 = (0..n)
        .map(|i| poly[i].cross(&poly[(i + 1) % n]))
        .sum();
    0.5 * sum
}

/// 点是否在多边形内部（射线法，边界上的点结果不确定）
#[must_use]
pub fn point_in_polygon(p: &Point2D, poly: &[Point2D]) -> bool {
    let n = poly.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (pi, pj) = (poly[i], poly[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// 两条二维线段是否严格相交（端点接触和共线重叠不计）
#[must_use]
pub fn segments_cross_2d(a: Point2D, b: Point2D, c: Point2D, d: Point2D) -> bool {
    let d1 = orient2d(a, b, c);
    let d2 = orient2d(a, b, d);
    let d3 = orient2d(c, d, a);
    let d4 = orient2d(c, d, b);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// 点是否在三角形内部或边界上（逆时针三角形）
#[must_use]
pub fn point_in_triangle_2d(p: Point2D, a: Point2D, b: Point2D, c: Point2D) -> bool {
    orient2d(a, b, p) >= 0.0 && orient2d(b, c, p) >= 0.0 && orient2d(c, a, p) >= 0.0
}
