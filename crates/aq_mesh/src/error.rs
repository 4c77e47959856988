// crates/aq_mesh/src/error.rs
//! 网格处理错误类型
//!
//! 包含网格格式、拓扑、IO 等错误定义
//! 所有错误可转换为 `aq_foundation::AqError` 向上传播

use aq_foundation::AqError;
use std::path::PathBuf;
use thiserror::Error;

/// 网格模块结果类型
pub type MeshResult<T> = Result<T, MeshError>;

/// 网格错误枚举
#[derive(Error, Debug)]
pub enum MeshError {
    /// 网格格式错误
    #[error("网格格式错误: {format}, 行 {line}: {message}")]
    MeshFormatError {
        /// 格式名称
        format: &'static str,
        /// 出错行号（二进制格式为 0）
        line: usize,
        /// 错误信息
        message: String,
    },

    /// 无法识别的网格数据
    #[error("无法识别的网格格式: {detail}")]
    UnknownFormat {
        /// 说明
        detail: String,
    },

    /// 拓扑错误
    #[error("拓扑错误: {operation} 失败, {details}")]
    InvalidTopology {
        /// 操作名称
        operation: &'static str,
        /// 详细信息
        details: String,
    },

    /// 空网格
    #[error("Mesh is empty")]
    EmptyMesh,

    /// 压缩或解压失败
    #[error("压缩数据错误: {message}")]
    Compression {
        /// 错误信息
        message: String,
    },

    /// 文件 IO 错误
    #[error("文件 IO 错误: {path}: {source}")]
    Io {
        /// 文件路径
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },
}

/// 转换到 Foundation 层错误
impl From<MeshError> for AqError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::MeshFormatError {
                format,
                line,
                message,
            } => AqError::parse(format!("<{format}>"), line, message),
            MeshError::UnknownFormat { detail } => {
                AqError::unsupported_format(detail, vec!["OFF".into(), "AQB1".into()])
            }
            MeshError::InvalidTopology { operation, details } => {
                AqError::invalid_mesh(format!("[{operation}] {details}"))
            }
            MeshError::EmptyMesh => AqError::invalid_mesh("Mesh is empty"),
            MeshError::Compression { message } => AqError::serialization(message),
            MeshError::Io { path, source } => {
                AqError::io_with_source(path.display().to_string(), source)
            }
        }
    }
}

/// 便捷构造函数
impl MeshError {
    /// 格式错误
    pub fn format_error(format: &'static str, line: usize, message: impl Into<String>) -> Self {
        Self::MeshFormatError {
            format,
            line,
            message: message.into(),
        }
    }

    /// 拓扑错误
    pub fn invalid_topology(operation: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidTopology {
            operation,
            details: details.into(),
        }
    }

    /// 文件 IO 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_to_foundation() {
        let err = MeshError::invalid_topology("from_parts", "vertex index 9 out of range");
        let aq: AqError = err.into();
        assert!(matches!(aq, AqError::InvalidMesh { .. }));
    }

    #[test]
    fn test_empty_mesh_message() {
        assert_eq!(MeshError::EmptyMesh.to_string(), "Mesh is empty");
    }

    #[test]
    fn test_format_error_display() {
        let err = MeshError::format_error("OFF", 4, "only triangle faces are supported");
        let msg = err.to_string();
        assert!(msg.contains("OFF"));
        assert!(msg.contains("行 4"));
    }
}
