//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `profile/`, `render/`, `utils/`
//! - 子模块: profile, inspect

pub mod inspect;
pub mod profile;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Profile(args) => profile::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
    }
}
