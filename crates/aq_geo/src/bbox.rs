// crates/aq_geo/src/bbox.rs

//! 3D 轴对齐包围盒
//!
//! 用于相交检测的粗筛、容差尺度的估计以及测试中的结果比对。
//!
//! ```
//! use aq_geo::{BoundingBox3D, Point3D};
//!
//! let bbox = BoundingBox3D::from_points([
//!     Point3D::new(0.0, 0.0, 0.0),
//!     Point3D::new(2.0, 1.0, 3.0),
//! ]);
//! assert_eq!(bbox.volume(), 6.0);
//! assert_eq!(bbox.with_max_z(1.5).max.z, 1.5);
//! ```

use crate::geometry::Point3D;
use serde::{Deserialize, Serialize};

/// 3D 轴对齐包围盒
///
/// 空包围盒以 `min > max` 表示（`min = +inf`, `max = -inf`）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    /// 最小角点
    pub min: Point3D,
    /// 最大角点
    pub max: Point3D,
}

impl Default for BoundingBox3D {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox3D {
    /// 由两个角点创建（自动排序分量）
    #[must_use]
    pub fn new(a: Point3D, b: Point3D) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// 空包围盒
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: Point3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// 由点集创建
    #[must_use]
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point3D>,
    {
        let mut bbox = Self::empty();
        for p in points {
            bbox.extend(&p);
        }
        bbox
    }

    /// 是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// 扩展以包含点
    pub fn extend(&mut self, p: &Point3D) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// 合并两个包围盒
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// 各方向尺寸
    #[must_use]
    pub fn size(&self) -> Point3D {
        if self.is_empty() {
            Point3D::ZERO
        } else {
            self.max - self.min
        }
    }

    /// 中心点
    #[must_use]
    pub fn center(&self) -> Point3D {
        (self.min + self.max) * 0.5
    }

    /// 对角线长度，空包围盒为 0
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    /// 体积
    #[must_use]
    pub fn volume(&self) -> f64 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// 各方向外扩 `amount`
    #[must_use]
    pub fn expand(&self, amount: f64) -> Self {
        let d = Point3D::new(amount, amount, amount);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// 将最大 Z 截断到给定高程
    #[must_use]
    pub fn with_max_z(&self, z: f64) -> Self {
        let mut bbox = *self;
        bbox.max.z = bbox.max.z.min(z);
        bbox
    }

    /// 在容差 `eps` 下检查两个包围盒是否相交（含接触）
    #[must_use]
    pub fn intersects(&self, other: &Self, eps: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x + eps
            && self.max.x + eps >= other.min.x
            && self.min.y <= other.max.y + eps
            && self.max.y + eps >= other.min.y
            && self.min.z <= other.max.z + eps
            && self.max.z + eps >= other.min.z
    }

    /// 以相对容差比较两个包围盒
    ///
    /// 每个角点分量允许的偏差为 `fraction * max(|参考值|, 参考对角线)`，
    /// `self` 视为参考值。
    #[must_use]
    pub fn approx_eq(&self, other: &Self, fraction: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.is_empty() && other.is_empty();
        }
        let diag = self.diagonal();
        let close = |reference: f64, value: f64| {
            (reference - value).abs() <= fraction * reference.abs().max(diag)
        };
        let (a_min, a_max) = (self.min.to_array(), self.max.to_array());
        let (b_min, b_max) = (other.min.to_array(), other.max.to_array());
        (0..3).all(|d| close(a_min[d], b_min[d]) && close(a_max[d], b_max[d]))
    }
}
