// crates/aq_config/src/aquifer_config.rs

//! AquiferConfig - 含水层计算配置
//!
//! 所有字段都有默认值，JSON 文件中可以只写需要修改的部分。
//!
//! ```json
//! {
//!   "engine": { "strategy": "waves", "tolerance": 1e-8 },
//!   "output": { "format": "aqb" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use aq_foundation::tolerance::{GeometricTolerance, DEFAULT_RELATIVE_TOLERANCE};
use aq_mesh::MeshFormat;

use crate::error::ConfigError;

/// 含水层计算配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AquiferConfig {
    /// 引擎参数
    #[serde(default)]
    pub engine: EngineConfig,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
}

/// 传播搜索策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropagationStrategy {
    /// 逐对出队检测
    #[default]
    Sequential,
    /// 按轮并行检测，串行接受
    Waves,
}

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 传播搜索策略
    #[serde(default)]
    pub strategy: PropagationStrategy,

    /// 体积计算是否并行
    #[serde(default = "default_parallel_volumes")]
    pub parallel_volumes: bool,

    /// 相对几何容差
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_parallel_volumes() -> bool { true }
fn default_tolerance() -> f64 { DEFAULT_RELATIVE_TOLERANCE }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: PropagationStrategy::default(),
            parallel_volumes: default_parallel_volumes(),
            tolerance: default_tolerance(),
        }
    }
}

impl EngineConfig {
    /// 几何容差
    pub fn geometric_tolerance(&self) -> GeometricTolerance {
        GeometricTolerance::new(self.tolerance)
    }
}

/// 输出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 网格文件格式
    #[serde(default)]
    pub format: MeshFormat,

    /// 文件名前缀
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// OFF 坐标小数位数
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_file_prefix() -> String { "aquifer_".to_string() }
fn default_precision() -> usize { 6 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: MeshFormat::default(),
            file_prefix: default_file_prefix(),
            precision: default_precision(),
        }
    }
}

impl OutputConfig {
    /// 第 `index` 个输出片段的文件名
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{}.{}", self.file_prefix, index, self.format.extension())
    }
}

impl AquiferConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// 从 JSON 文本解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: AquiferConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tol = self.engine.tolerance;
        if !(0.0..1.0).contains(&tol) {
            return Err(ConfigError::invalid(
                "engine.tolerance",
                tol,
                "容差必须在 [0, 1) 范围内",
            ));
        }

        if !(1..=17).contains(&self.output.precision) {
            return Err(ConfigError::invalid(
                "output.precision",
                self.output.precision,
                "小数位数必须在 1..=17 范围内",
            ));
        }

        let prefix = &self.output.file_prefix;
        if prefix.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "output.file_prefix",
                prefix,
                "前缀不能包含路径分隔符",
            ));
        }

        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
