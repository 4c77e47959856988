// apps/aq_cli/src/commands/protocol.rs

//! 标准输入命令协议
//!
//! ```text
//! Mesh <unitId> <file>
//! Spring <springId> <unitId> <x> <y> <z>
//! ...
//! Compute <outputDir>
//! ```
//!
//! 读到 `Compute` 即结束，之后的行被忽略。空行跳过，未知命令只记警告。
//! 文件路径取命令后的整行剩余部分，可以包含空格。

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use aq_engine::{Spring, UnitId};
use aq_geo::Point3D;
use tracing::warn;

/// 单条命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 注册单元网格文件
    Mesh {
        /// 单元 ID
        id: UnitId,
        /// 网格文件
        path: PathBuf,
    },
    /// 注册泉点
    Spring(Spring),
    /// 开始计算
    Compute {
        /// 输出目录
        output_dir: PathBuf,
    },
}

/// 一次计算的全部输入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// 单元 ID 与网格文件，按输入顺序
    pub meshes: Vec<(UnitId, PathBuf)>,
    /// 泉点，按输入顺序
    pub springs: Vec<Spring>,
    /// 输出目录
    pub output_dir: PathBuf,
}

/// 把一行拆成命令名和剩余部分
fn split_head(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}

/// 解析单行，空行和未知命令返回 `None`
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let (cmd, rest) = split_head(line);
    let command = match cmd {
        "" => return Ok(None),
        "Mesh" => {
            let (id, path) = split_head(rest);
            let id: UnitId = id.parse().with_context(|| format!("无效的单元 ID: {id:?}"))?;
            if path.is_empty() {
                bail!("Mesh 命令缺少文件路径");
            }
            Command::Mesh {
                id,
                path: PathBuf::from(path),
            }
        }
        "Spring" => {
            let fields: Vec<&str> = rest.split_whitespace().collect();
            let [id, unit, x, y, z] = fields[..] else {
                bail!("Spring 命令需要 5 个参数，实际为 {}", fields.len());
            };
            let coord = |s: &str| -> Result<f64> {
                s.parse::<f64>().with_context(|| format!("无效的坐标: {s:?}"))
            };
            Command::Spring(Spring::new(
                id.parse().with_context(|| format!("无效的泉点 ID: {id:?}"))?,
                Point3D::new(coord(x)?, coord(y)?, coord(z)?),
                unit.parse().with_context(|| format!("无效的单元 ID: {unit:?}"))?,
            ))
        }
        "Compute" => {
            if rest.is_empty() {
                bail!("Compute 命令缺少输出目录");
            }
            Command::Compute {
                output_dir: PathBuf::from(rest),
            }
        }
        other => {
            warn!("Invalid command: {other}");
            return Ok(None);
        }
    };
    Ok(Some(command))
}

/// 读取命令直到 `Compute`
pub fn read_session<R: BufRead>(reader: R) -> Result<Session> {
    let mut session = Session::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line.context("读取标准输入失败")?;
        let command = parse_line(&line).with_context(|| format!("第 {} 行: {}", i + 1, line.trim()))?;
        match command {
            Some(Command::Mesh { id, path }) => session.meshes.push((id, path)),
            Some(Command::Spring(spring)) => session.springs.push(spring),
            Some(Command::Compute { output_dir }) => {
                session.output_dir = output_dir;
                return Ok(session);
            }
            None => {}
        }
    }
    bail!("输入结束，但没有收到 Compute 命令")
}
