// apps\aq_cli\src\commands\compute.rs

//! 含水层计算命令
//!
//! 从标准输入（或 `--input` 文件）读取命令，计算后把每个片段写到
//! `<输出目录>/<前缀><序号>.<扩展名>`，并在标准输出逐行打印 JSON：
//!
//! ```text
//! {"file":"out/aquifer_0.off","unitId":1,"springId":10,"volume":0.5}
//! ```

use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aq_config::AquiferConfig;
use aq_engine::{AquiferCalculator, BodyElement, EngineError, SpringId, Unit, UnitId};
use aq_mesh::{io::save_mesh_file, load_mesh_file, MeshFormat};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use super::protocol::{read_session, Session};

/// 计算参数
#[derive(Args)]
pub struct ComputeArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 命令文件，缺省时读标准输入
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// 覆盖配置中的输出格式
    #[arg(long, value_parser = parse_format)]
    pub format: Option<MeshFormat>,
}

fn parse_format(s: &str) -> std::result::Result<MeshFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "off" => Ok(MeshFormat::Off),
        "aqb" => Ok(MeshFormat::Aqb),
        other => Err(format!("未知的网格格式: {other} (可选 off, aqb)")),
    }
}

/// 单个片段的输出记录
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRecord {
    /// 输出文件
    pub file: String,
    /// 来源单元
    pub unit_id: UnitId,
    /// 主泉点
    pub spring_id: SpringId,
    /// 体积
    pub volume: f64,
}

/// 执行计算命令
pub fn execute(args: ComputeArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AquiferConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => AquiferConfig::default(),
    };
    if let Some(format) = args.format {
        config.output.format = format;
    }

    let session = match &args.input {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("无法打开命令文件 {}", path.display()))?;
            read_session(BufReader::new(file))?
        }
        None => read_session(io::stdin().lock())?,
    };

    let stdout = io::stdout();
    let records = run_session(&session, &config, &mut stdout.lock())?;
    info!(fragments = records.len(), "输出完成");
    Ok(())
}

/// 加载网格、计算并写出结果，返回输出记录
pub fn run_session<W: Write>(
    session: &Session,
    config: &AquiferConfig,
    out: &mut W,
) -> Result<Vec<FragmentRecord>> {
    let units = load_units(&session.meshes)?;
    info!(units = units.len(), springs = session.springs.len(), "开始计算");

    let calculator = AquiferCalculator::new(config.engine.clone());
    let bodies = calculator
        .calculate(&units, &session.springs)
        .context("Failed to compute aquifers")?;
    if bodies.is_empty() {
        return Err(EngineError::NoAquifersProduced {
            springs: session.springs.len(),
        }
        .into());
    }

    fs::create_dir_all(&session.output_dir)
        .with_context(|| format!("无法创建输出目录 {}", session.output_dir.display()))?;
    write_bodies(&bodies, &session.output_dir, config, out)
}

fn load_units(meshes: &[(UnitId, PathBuf)]) -> Result<Vec<Unit>> {
    meshes
        .iter()
        .map(|(id, path)| {
            let mesh = load_mesh_file(path)
                .with_context(|| format!("Failed to load mesh file {id} ({})", path.display()))?;
            debug!(unit = id, vertices = mesh.n_vertices(), faces = mesh.n_faces(), "加载单元");
            Ok(Unit::new(*id, mesh))
        })
        .collect()
}

fn write_bodies<W: Write>(
    bodies: &[BodyElement],
    dir: &Path,
    config: &AquiferConfig,
    out: &mut W,
) -> Result<Vec<FragmentRecord>> {
    let output = &config.output;
    let mut records = Vec::with_capacity(bodies.len());
    for (i, body) in bodies.iter().enumerate() {
        let path = dir.join(output.file_name(i));
        save_mesh_file(&path, &body.mesh, output.format, output.precision)
            .with_context(|| format!("无法写出 {}", path.display()))?;

        let record = FragmentRecord {
            file: path.display().to_string(),
            unit_id: body.unit_id,
            spring_id: body.spring.id,
            volume: body.volume,
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
        records.push(record);
    }
    out.flush()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_geo::Point3D;
    use aq_mesh::generation::box_mesh;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("aq_cli_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_box(dir: &Path, name: &str, min: Point3D, max: Point3D) -> PathBuf {
        let path = dir.join(name);
        save_mesh_file(&path, &box_mesh(min, max), MeshFormat::Off, 6).unwrap();
        path
    }

    #[test]
    fn test_record_json_fields() {
        let record = FragmentRecord {
            file: r"C:\out\aquifer_0.off".into(),
            unit_id: 3,
            spring_id: 9,
            volume: 0.5,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"file":"C:\\out\\aquifer_0.off","unitId":3,"springId":9,"volume":0.5}"#
        );
    }

    #[test]
    fn test_run_session_writes_files() {
        let dir = scratch_dir("run");
        let a = write_box(&dir, "a.off", Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
        let b = write_box(&dir, "b.off", Point3D::new(1.0, 0.0, 0.0), Point3D::new(2.0, 1.0, 1.0));
        let input = format!(
            "Mesh 1 {}\nMesh 2 {}\nSpring 5 1 0.5 0.5 0.5\nCompute {}\n",
            a.display(),
            b.display(),
            dir.join("out").display()
        );
        let session = read_session(input.as_bytes()).unwrap();

        let mut stdout = Vec::new();
        let records = run_session(&session, &AquiferConfig::default(), &mut stdout).unwrap();
        assert_eq!(records.len(), 2);

        let text = String::from_utf8(stdout).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line["springId"], 5);
            let file = line["file"].as_str().unwrap();
            assert!(file.ends_with(&format!("aquifer_{i}.off")));
            let mesh = load_mesh_file(file).unwrap();
            assert!((aq_mesh::measure::signed_volume(&mesh) - 0.5).abs() < 1e-5);
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_no_fragments_is_an_error() {
        let dir = scratch_dir("empty");
        let a = write_box(&dir, "a.off", Point3D::ZERO, Point3D::new(1.0, 1.0, 1.0));
        let session = Session {
            meshes: vec![(1, a)],
            springs: vec![aq_engine::Spring::new(1, Point3D::new(0.5, 0.5, -2.0), 1)],
            output_dir: dir.join("out"),
        };
        let err = run_session(&session, &AquiferConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(err
            .to_string()
            .contains("could not generate any aquifer mesh, number of springs: 1"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_mesh_file() {
        let session = Session {
            meshes: vec![(4, PathBuf::from("/nonexistent/aq/unit.off"))],
            springs: Vec::new(),
            output_dir: PathBuf::from("unused"),
        };
        let err = run_session(&session, &AquiferConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Failed to load mesh file 4"));
    }
}
