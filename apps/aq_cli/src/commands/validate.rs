// apps\aq_cli\src\commands\validate.rs

//! 验证命令
//!
//! 检查单元网格是否为闭合二维流形，以及配置文件是否有效。

use anyhow::{bail, Result};
use aq_config::AquiferConfig;
use aq_foundation::validation::ValidationReport;
use aq_mesh::{load_mesh_file, validate::validate_mesh};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 网格文件路径，可重复
    #[arg(short, long, num_args = 1..)]
    pub mesh: Vec<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果汇总
#[derive(Default)]
struct Summary {
    errors: usize,
    warnings: usize,
}

impl Summary {
    fn is_ok(&self, strict: bool) -> bool {
        self.errors == 0 && (!strict || self.warnings == 0)
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== Aquifer 验证 ===");

    if args.config.is_none() && args.mesh.is_empty() {
        println!("用法: aq_cli validate --mesh <网格文件>... [--config <配置文件>]");
        return Ok(());
    }

    let mut summary = Summary::default();

    if let Some(path) = &args.config {
        validate_config(path, &mut summary);
    }
    for path in &args.mesh {
        validate_mesh_file(path, &mut summary);
    }

    println!("\n=== 验证结果 ===");
    if summary.is_ok(args.strict) {
        println!("✓ 验证通过");
        Ok(())
    } else {
        println!("✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            summary.errors,
            summary.warnings
        )
    }
}

fn validate_config(path: &Path, summary: &mut Summary) {
    println!("\n检查配置文件: {}", path.display());
    match AquiferConfig::from_file(path) {
        Ok(_) => println!("  ✓ 配置有效"),
        Err(e) => {
            error!("{e}");
            println!("  ✗ {e}");
            summary.errors += 1;
        }
    }
}

fn validate_mesh_file(path: &Path, summary: &mut Summary) {
    println!("\n检查网格文件: {}", path.display());
    let mesh = match load_mesh_file(path) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("{e}");
            println!("  ✗ {e}");
            summary.errors += 1;
            return;
        }
    };
    println!("  顶点 {}，面 {}", mesh.n_vertices(), mesh.n_faces());
    let report = validate_mesh(&mesh);
    print_report(&report);
    summary.errors += report.error_count();
    summary.warnings += report.warning_count();
}

/// 最多逐条打印的条目数
const MAX_LISTED: usize = 20;

fn print_report(report: &ValidationReport) {
    if report.is_valid() && !report.has_warnings() {
        println!("  ✓ 闭合流形");
        return;
    }
    for err in report.errors.iter().take(MAX_LISTED) {
        error!("{err}");
        println!("  ✗ {err}");
    }
    if report.error_count() > MAX_LISTED {
        println!("  ... 另有 {} 个错误", report.error_count() - MAX_LISTED);
    }
    for warning in &report.warnings {
        warn!("{warning}");
        println!("  ⚠ {warning}");
    }
}
