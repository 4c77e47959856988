// crates\aq_foundation\src/validation.rs

//! 运行时验证工具
//!
//! 提供网格验证报告和错误/警告类型。单元网格在参与计算前必须是
//! 闭合的二维流形，验证器把发现的每一处缺陷记录在报告中，
//! 由调用方决定是否终止。
//!
//! # 示例
//!
//! ```
//! use aq_foundation::validation::{ValidationReport, ValidationError};
//!
//! let mut report = ValidationReport::new();
//! report.add_error(ValidationError::BoundaryEdge { from: 0, to: 1 });
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.error_count(), 1);
//! ```

use std::fmt;

/// 验证报告
#[derive(Debug, Default, Clone)]
pub struct ValidationReport {
    /// 错误列表
    pub errors: Vec<ValidationError>,
    /// 警告列表
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// 创建空的验证报告
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加错误
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 是否有警告
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// 错误数量
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 警告数量
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// 是否通过（无错误）
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// 合并另一个报告
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "验证报告:")?;
        writeln!(f, "  错误: {} 个", self.error_count())?;
        writeln!(f, "  警告: {} 个", self.warning_count())?;

        if self.has_errors() {
            writeln!(f, "\n错误详情:")?;
            for (i, err) in self.errors.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, err)?;
            }
        }

        if self.has_warnings() {
            writeln!(f, "\n警告详情:")?;
            for (i, warn) in self.warnings.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, warn)?;
            }
        }

        Ok(())
    }
}

/// 验证错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// 网格没有任何面
    EmptyMesh,
    /// 顶点坐标非有限值
    NonFiniteVertex {
        /// 顶点索引
        vertex: usize,
    },
    /// 面引用了不存在的顶点
    InvalidVertexIndex {
        /// 面索引
        face: usize,
        /// 越界的顶点索引
        vertex: usize,
        /// 顶点总数
        len: usize,
    },
    /// 退化面（重复顶点）
    DegenerateFace {
        /// 面索引
        face: usize,
    },
    /// 边界边：有向边没有反向配对
    BoundaryEdge {
        /// 起点
        from: usize,
        /// 终点
        to: usize,
    },
    /// 非流形边：同一有向边出现多次
    NonManifoldEdge {
        /// 起点
        from: usize,
        /// 终点
        to: usize,
        /// 出现次数
        count: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMesh => write!(f, "网格为空"),
            Self::NonFiniteVertex { vertex } => {
                write!(f, "顶点{}: 坐标非有限值", vertex)
            }
            Self::InvalidVertexIndex { face, vertex, len } => {
                write!(f, "面{}: 顶点索引{}超出范围 0..{}", face, vertex, len)
            }
            Self::DegenerateFace { face } => write!(f, "面{}: 退化（重复顶点）", face),
            Self::BoundaryEdge { from, to } => {
                write!(f, "边({}, {}): 边界边，网格不闭合", from, to)
            }
            Self::NonManifoldEdge { from, to, count } => {
                write!(f, "边({}, {}): 出现{}次，非流形或方向不一致", from, to, count)
            }
        }
    }
}

/// 验证警告类型
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// 孤立顶点（未被任何面引用）
    IsolatedVertex {
        /// 顶点索引
        vertex: usize,
    },
    /// 包含多个连通分量
    MultipleComponents {
        /// 分量数量
        count: usize,
    },
    /// 有向体积为负（面朝内）
    InvertedOrientation {
        /// 有向体积
        volume: f64,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsolatedVertex { vertex } => write!(f, "顶点{}: 孤立顶点", vertex),
            Self::MultipleComponents { count } => write!(f, "网格包含{}个连通分量", count),
            Self::InvertedOrientation { volume } => {
                write!(f, "有向体积为负({:.6})，面法向可能朝内", volume)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationReport::new();
        a.add_error(ValidationError::EmptyMesh);
        let mut b = ValidationReport::new();
        b.add_warning(ValidationWarning::IsolatedVertex { vertex: 3 });
        a.merge(b);
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.warning_count(), 1);
    }

    #[test]
    fn test_display_lists_details() {
        let mut report = ValidationReport::new();
        report.add_error(ValidationError::NonManifoldEdge {
            from: 1,
            to: 2,
            count: 2,
        });
        let text = report.to_string();
        assert!(text.contains("错误: 1 个"));
        assert!(text.contains("边(1, 2)"));
    }
}
