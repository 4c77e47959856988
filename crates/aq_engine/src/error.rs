// crates/aq_engine/src/error.rs

//! 引擎层错误类型
//!
//! 所有错误都是致命的：出现任何一个都不返回部分结果。

use aq_foundation::AqError;
use aq_mesh::MeshError;
use thiserror::Error;

use crate::model::{SpringId, UnitId};

/// 引擎结果类型
pub type EngineResult<T> = Result<T, EngineError>;

/// 引擎错误
#[derive(Error, Debug)]
pub enum EngineError {
    /// 泉点引用了不存在的单元
    #[error("invalid unit id {unit} (spring {spring})")]
    UnknownUnit {
        /// 单元 ID
        unit: UnitId,
        /// 引用它的泉点
        spring: SpringId,
    },

    /// 被引用的单元网格不是闭合流形
    #[error("unit {unit} is not closed")]
    InvalidGeometry {
        /// 单元 ID
        unit: UnitId,
    },

    /// 泉点坐标不是有限值
    #[error("spring {spring} has a non-finite location")]
    InvalidSpring {
        /// 泉点 ID
        spring: SpringId,
    },

    /// 所有泉点都没有产生含水层
    #[error("could not generate any aquifer mesh, number of springs: {springs}")]
    NoAquifersProduced {
        /// 泉点数
        springs: usize,
    },

    /// 网格层错误
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl From<EngineError> for AqError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Mesh(e) => e.into(),
            EngineError::InvalidGeometry { .. } => AqError::invalid_mesh(err.to_string()),
            other => AqError::invalid_input(other.to_string()),
        }
    }
}
