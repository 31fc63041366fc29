//! # xrdprofile - 二维衍射扫描剖面工具
//!
//! 解析衍射仪 XRDML 数据文件（二维强度网格 + 角度轴标定），
//! 在选定的角度窗口内提取列/行投影剖面、计算质心并输出叠加图或数据。
//!
//! ## 子命令
//! - `profile` - 提取剖面并输出 (PNG/SVG/CSV/XY)，支持批量目录
//! - `inspect` - 显示扫描文件信息
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (数据与标定解析)
//!   │     ├── profile/   (窗口映射、剖面、参考峰位)
//!   │     ├── render/    (图表与数据导出)
//!   │     ├── batch/     (批量处理)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出与进度条)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod profile;
mod render;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        log::debug!("{:?}", e);
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

/// 初始化日志，`RUST_LOG` 优先于 `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
