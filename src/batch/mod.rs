//! # 批量处理模块
//!
//! 对目录中的多个 XRDML 文件执行同样的剖面提取。
//!
//! ## 功能
//! - 按 glob 模式收集文件（可递归）
//! - 并行处理
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchRunner, ProcessResult};
