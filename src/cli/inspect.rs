//! # inspect 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use clap::Args;
use std::path::PathBuf;

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// XRDML data file
    pub file: PathBuf,

    /// Use the legacy "<name> (<name>)" axis label format
    #[arg(long, default_value_t = false)]
    pub legacy_label: bool,
}
