// crates/aq_geo/src/plane.rs

//! 切割平面
//!
//! 平面以一点和单位法向表示。`signed_distance` 为正的一侧是被切除的
//! 半空间，保留的是 `signed_distance <= 0` 的部分。

use crate::geometry::Point3D;
use serde::{Deserialize, Serialize};

/// 切割平面
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// 平面上一点
    pub origin: Point3D,
    /// 单位法向，指向被切除的一侧
    pub normal: Point3D,
}

impl Plane {
    /// 由点和法向创建，法向为零向量时返回 `None`
    #[must_use]
    pub fn new(origin: Point3D, normal: Point3D) -> Option<Self> {
        normal.normalize().map(|normal| Self { origin, normal })
    }

    /// 高程 `z` 处的水平面，保留其下方部分
    #[must_use]
    pub const fn horizontal(z: f64) -> Self {
        Self {
            origin: Point3D::new(0.0, 0.0, z),
            normal: Point3D::UNIT_Z,
        }
    }

    /// 有向距离
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, p: &Point3D) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    /// 平面内的右手正交基 `(u, v)`，满足 `u × v = normal`
    #[must_use]
    pub fn basis(&self) -> (Point3D, Point3D) {
        let n = self.normal;
        let helper = if n.x.abs() < 0.9 {
            Point3D::new(1.0, 0.0, 0.0)
        } else {
            Point3D::new(0.0, 1.0, 0.0)
        };
        let u = helper.cross(&n).normalize().unwrap_or(Point3D::new(1.0, 0.0, 0.0));
        let v = n.cross(&u);
        (u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal() {
        let plane = Plane::horizontal(2.0);
        assert_eq!(plane.signed_distance(&Point3D::new(5.0, -3.0, 3.0)), 1.0);
        assert_eq!(plane.signed_distance(&Point3D::new(0.0, 0.0, 1.5)), -0.5);
    }

    #[test]
    fn test_zero_normal_rejected() {
        assert!(Plane::new(Point3D::ZERO, Point3D::ZERO).is_none());
    }

    #[test]
    fn test_basis_is_right_handed() {
        for n in [
            Point3D::UNIT_Z,
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(1.0, 2.0, -3.0),
        ] {
            let plane = Plane::new(Point3D::ZERO, n).unwrap();
            let (u, v) = plane.basis();
            assert!(u.dot(&plane.normal).abs() < 1e-12);
            assert!(u.cross(&v).distance(&plane.normal) < 1e-12);
        }
    }
}
