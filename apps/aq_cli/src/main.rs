// apps\aq_cli\src/main.rs

//! Aquifer 命令行界面
//!
//! - `compute`: 从标准输入读取命令，计算含水层并写出网格
//! - `validate`: 检查网格是否为闭合流形、配置是否有效
//! - `info`: 显示网格统计和默认配置
//!
//! 日志写到标准错误，标准输出只留给 `compute` 的 JSON 行。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// 含水层传播计算命令行工具
#[derive(Parser)]
#[command(name = "aq_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Groundwater body computation from geological unit meshes and springs", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 计算含水层
    Compute(commands::compute::ComputeArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
    /// 验证网格和配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Compute(args) => commands::compute::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
