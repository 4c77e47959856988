// crates/aq_mesh/src/io/mod.rs

//! 网格读写
//!
//! 支持两种格式：
//! - [`MeshFormat::Off`]：OFF 文本格式，便于检查和与其他工具交换
//! - [`MeshFormat::Aqb`]：AQB 二进制格式，无损且带 LZ4 压缩
//!
//! 读取时根据文件头自动识别格式。

pub mod aqb;
pub mod off;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::trimesh::TriMesh;

/// 默认 OFF 输出精度（小数位数）
pub const DEFAULT_PRECISION: usize = 6;

/// 网格文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    /// OFF 文本
    #[default]
    Off,
    /// AQB 二进制
    Aqb,
}

impl MeshFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Aqb => "aqb",
        }
    }

    /// 根据扩展名推断格式（不区分大小写）
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "off" => Some(Self::Off),
            "aqb" => Some(Self::Aqb),
            _ => None,
        }
    }
}

impl std::fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// 根据文件头识别格式
pub fn detect_format(bytes: &[u8]) -> MeshResult<MeshFormat> {
    if bytes.starts_with(aqb::AQB_MAGIC) {
        return Ok(MeshFormat::Aqb);
    }
    // OFF 文件允许前导空白和注释
    let text_start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(bytes, |i| &bytes[i..]);
    if text_start.starts_with(off::OFF_MAGIC.as_bytes()) || text_start.starts_with(b"#") {
        return Ok(MeshFormat::Off);
    }
    let preview: String = String::from_utf8_lossy(&bytes[..bytes.len().min(8)]).into_owned();
    Err(MeshError::UnknownFormat {
        detail: format!("文件头 {preview:?}"),
    })
}

/// 从字节加载网格，自动识别格式
pub fn load_mesh(bytes: &[u8]) -> MeshResult<TriMesh> {
    match detect_format(bytes)? {
        MeshFormat::Aqb => aqb::read_aqb(bytes),
        MeshFormat::Off => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| MeshError::format_error("OFF", 0, format!("不是有效的 UTF-8: {e}")))?;
            off::read_off(text)
        }
    }
}

/// 编码网格，OFF 使用默认精度
pub fn save_mesh(mesh: &TriMesh, format: MeshFormat) -> MeshResult<Vec<u8>> {
    save_mesh_with_precision(mesh, format, DEFAULT_PRECISION)
}

/// 编码网格，`precision` 只对 OFF 生效
pub fn save_mesh_with_precision(
    mesh: &TriMesh,
    format: MeshFormat,
    precision: usize,
) -> MeshResult<Vec<u8>> {
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    Ok(match format {
        MeshFormat::Off => off::write_off(mesh, precision).into_bytes(),
        MeshFormat::Aqb => aqb::write_aqb(mesh, true),
    })
}

/// 从文件加载网格
pub fn load_mesh_file(path: impl AsRef<Path>) -> MeshResult<TriMesh> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| MeshError::io(path, e))?;
    load_mesh(&bytes)
}

/// 保存网格到文件
pub fn save_mesh_file(
    path: impl AsRef<Path>,
    mesh: &TriMesh,
    format: MeshFormat,
    precision: usize,
) -> MeshResult<()> {
    let path = path.as_ref();
    let bytes = save_mesh_with_precision(mesh, format, precision)?;
    fs::write(path, bytes).map_err(|e| MeshError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::box_mesh;
    use aq_geo::Point3D;

    fn unit_box() -> TriMesh {
        box_mesh(Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"OFF\n").unwrap(), MeshFormat::Off);
        assert_eq!(detect_format(b"  \n# c\nOFF\n").unwrap(), MeshFormat::Off);
        assert_eq!(detect_format(b"AQB1....").unwrap(), MeshFormat::Aqb);
        assert!(matches!(
            detect_format(b"solid x"),
            Err(MeshError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_load_both_formats() {
        let mesh = unit_box();
        for format in [MeshFormat::Off, MeshFormat::Aqb] {
            let bytes = save_mesh(&mesh, format).unwrap();
            assert_eq!(load_mesh(&bytes).unwrap(), mesh, "{format}");
        }
    }

    #[test]
    fn test_save_empty_mesh_fails() {
        assert!(matches!(
            save_mesh(&TriMesh::new(), MeshFormat::Off),
            Err(MeshError::EmptyMesh)
        ));
    }

    #[test]
    fn test_format_serde_and_extension() {
        let json = serde_json::to_string(&MeshFormat::Aqb).unwrap();
        assert_eq!(json, "\"aqb\"");
        let back: MeshFormat = serde_json::from_str("\"off\"").unwrap();
        assert_eq!(back, MeshFormat::Off);
        assert_eq!(MeshFormat::from_path(Path::new("a/b.OFF")), Some(MeshFormat::Off));
        assert_eq!(MeshFormat::from_path(Path::new("a/b.stl")), None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("aq_mesh_io_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("box.off");
        save_mesh_file(&path, &unit_box(), MeshFormat::Off, 3).unwrap();
        assert_eq!(load_mesh_file(&path).unwrap(), unit_box());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_mesh_file("/nonexistent/aq/mesh.off").unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
    }
}
