// crates\aq_foundation\src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `AqError` 枚举和 `AqResult` 类型别名，用于整个工作区的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，网格与引擎错误在各自 crate 中定义，
//!    并可转换为 `AqError` 向上传播
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **可追溯**: IO 错误保留底层错误链
//!
//! # 示例
//!
//! ```
//! use aq_foundation::error::{AqError, AqResult};
//!
//! fn read_unit() -> AqResult<()> {
//!     Err(AqError::invalid_mesh("单元网格为空"))
//! }
//!
//! assert!(read_unit().is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type AqResult<T> = Result<T, AqError>;

/// 含水层计算错误类型
#[derive(Error, Debug)]
pub enum AqError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 不支持的文件格式
    #[error("不支持的文件格式: {format} (支持的格式: {supported:?})")]
    UnsupportedFormat {
        /// 输入文件格式
        format: String,
        /// 支持的格式列表
        supported: Vec<String>,
    },

    /// 文件解析错误
    #[error("文件解析错误: {file} 第{line}行: {message}")]
    ParseError {
        /// 文件路径（内存数据时为 `<memory>`）
        file: PathBuf,
        /// 行号
        line: usize,
        /// 错误信息
        message: String,
    },

    // ========================================================================
    // 数据相关错误
    // ========================================================================

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 无效网格
    #[error("无效的网格: {message}")]
    InvalidMesh {
        /// 具体错误信息
        message: String,
    },

    // ========================================================================
    // 编码相关错误
    // ========================================================================

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl AqError {
    /// IO 错误（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 不支持的格式
    pub fn unsupported_format(format: impl Into<String>, supported: Vec<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            supported,
        }
    }

    /// 解析错误
    pub fn parse(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 无效网格
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AqError {
    fn from(err: std::io::Error) -> Self {
        Self::io_with_source(err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AqError::parse("unit.off", 3, "顶点坐标缺失");
        let msg = err.to_string();
        assert!(msg.contains("unit.off"));
        assert!(msg.contains("第3行"));
    }

    #[test]
    fn test_unsupported_format_lists_choices() {
        let err = AqError::unsupported_format("stl", vec!["OFF".into(), "AQB1".into()]);
        let msg = err.to_string();
        assert!(msg.contains("stl"));
        assert!(msg.contains("AQB1"));
    }

    #[test]
    fn test_io_conversion_keeps_source() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AqError = io.into();
        assert!(err.source().is_some());
    }
}
