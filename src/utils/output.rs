//! # 美化输出工具
//!
//! 提供统一的终端输出样式：带颜色标签的消息、标题栏、失败列表。
//!
//! ## 依赖关系
//! - 被 `main.rs` 与所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};

/// 消息级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Ok,
    Err,
    Warn,
    Info,
}

fn tag(level: Level) -> ColoredString {
    match level {
        Level::Ok => "[OK]".green().bold(),
        Level::Err => "[ERR]".red().bold(),
        Level::Warn => "[WARN]".yellow().bold(),
        Level::Info => "[*]".blue().bold(),
    }
}

fn emit(level: Level, msg: &str) {
    match level {
        Level::Err => eprintln!("{} {}", tag(level), msg),
        _ => println!("{} {}", tag(level), msg),
    }
}

/// 打印成功消息
pub fn print_success(msg: &str) {
    emit(Level::Ok, msg);
}

/// 打印错误消息（stderr）
pub fn print_error(msg: &str) {
    emit(Level::Err, msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    emit(Level::Warn, msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    emit(Level::Info, msg);
}

/// 打印一个带名称的数值结果，如质心
pub fn print_value(name: &str, value: f64, unit: &str) {
    println!("    {:<24} {} {}", name.dimmed(), format!("{:.4}", value).bold(), unit);
}

/// 打印失败列表，最多 `limit` 条
pub fn print_failures(failures: &[(String, String)], limit: usize) {
    if failures.is_empty() {
        return;
    }
    print_warning("Failed files:");
    for (path, err) in failures.iter().take(limit) {
        print_error(&format!("  {}: {}", path, err));
    }
    if failures.len() > limit {
        print_warning(&format!("  ... and {} more", failures.len() - limit));
    }
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}
