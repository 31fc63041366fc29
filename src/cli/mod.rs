//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `profile`: 提取角度窗口剖面并输出图像或数据
//! - `inspect`: 显示扫描文件的网格与标定信息
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: profile, inspect

pub mod inspect;
pub mod profile;

use clap::{ArgAction, Parser, Subcommand};

/// xrdprofile - 二维衍射扫描剖面工具
#[derive(Parser)]
#[command(name = "xrdprofile")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Extract angular-window profiles from 2D diffraction scans (XRDML)", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Extract column/row profiles in an angular window and plot or export them
    Profile(profile::ProfileArgs),

    /// Show grid size and axis calibration of a scan file
    Inspect(inspect::InspectArgs),
}
