// crates/aq_foundation/src/tolerance.rs

//! 几何容差
//!
//! 所有几何谓词（平面分类、接触判定、重合判定）共用一个相对容差，
//! 在使用处按模型尺度换算为绝对容差。容差以参数注入，不存在全局状态。
//!
//! ```
//! use aq_foundation::tolerance::GeometricTolerance;
//!
//! let tol = GeometricTolerance::new(1e-9);
//! // 模型尺度 1000 m 时的绝对容差
//! assert!((tol.absolute(1000.0) - 1e-6).abs() < 1e-18);
//! // 尺度小于 1 时按 1 处理
//! assert_eq!(tol.absolute(0.01), 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// 默认相对容差
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-9;

/// 几何容差（相对值）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometricTolerance {
    /// 相对容差，乘以模型尺度得到绝对容差
    pub relative: f64,
}

impl Default for GeometricTolerance {
    fn default() -> Self {
        Self {
            relative: DEFAULT_RELATIVE_TOLERANCE,
        }
    }
}

impl GeometricTolerance {
    /// 创建容差
    pub const fn new(relative: f64) -> Self {
        Self { relative }
    }

    /// 精确模式（容差为零）
    pub const fn exact() -> Self {
        Self { relative: 0.0 }
    }

    /// 按模型尺度换算绝对容差
    ///
    /// 尺度不足 1 时按 1 处理，避免小模型上容差退化为零。
    #[inline]
    pub fn absolute(&self, scale: f64) -> f64 {
        self.relative * scale.abs().max(1.0)
    }

    /// 判断值在给定尺度下是否视为零
    #[inline]
    pub fn is_zero(&self, value: f64, scale: f64) -> bool {
        value.abs() <= self.absolute(scale)
    }
}
