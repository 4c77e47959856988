// apps\aq_cli\src\commands\info.rs

//! 信息显示命令
//!
//! 显示网格统计和默认配置。

use anyhow::{Context, Result};
use aq_config::AquiferConfig;
use aq_mesh::{load_mesh_file, GeometryKernel, TriMeshKernel};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 网格文件路径，可重复
    #[arg(short, long, num_args = 1..)]
    pub mesh: Vec<PathBuf>,

    /// 显示默认配置
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== Aquifer 信息 ===");

    for path in &args.mesh {
        print_mesh_info(path)?;
    }

    if args.defaults || args.mesh.is_empty() {
        print_default_config()?;
    }

    Ok(())
}

fn print_mesh_info(path: &Path) -> Result<()> {
    let mesh = load_mesh_file(path).with_context(|| format!("无法加载网格 {}", path.display()))?;
    let kernel = TriMeshKernel::default();
    let bbox = mesh.bbox();

    println!("=== {} ===", path.display());
    println!("顶点数: {}", mesh.n_vertices());
    println!("面数: {}", mesh.n_faces());
    println!(
        "包围盒: ({:.6}, {:.6}, {:.6}) - ({:.6}, {:.6}, {:.6})",
        bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z
    );
    println!("连通分量: {}", kernel.connected_components(&mesh).len());

    if kernel.is_closed_manifold(&mesh) {
        println!("闭合流形: 是");
        println!("体积: {:.6}", kernel.volume(&mesh));
    } else {
        println!("闭合流形: 否（运行 validate 查看详情）");
    }
    println!();
    Ok(())
}

fn print_default_config() -> Result<()> {
    println!("=== 默认配置 ===");
    let json = serde_json::to_string_pretty(&AquiferConfig::default())?;
    println!("{json}");
    Ok(())
}
