//! # 统一错误处理模块
//!
//! 定义 xrdprofile 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 格式错误: 数据文件缺少标记、数据行损坏、行长度不一致
//! - 范围错误: 角度窗口映射到数组索引之外
//! - 空窗口错误: 窗口内没有列，或剖面全为零
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xrdprofile 统一错误类型
#[derive(Error, Debug)]
pub enum XrdProfileError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed data file: {source_name}\nReason: {reason}")]
    FormatError { source_name: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 剖面提取错误
    // ─────────────────────────────────────────────────────────────
    #[error("Window {start}..{end} is outside the calibrated range: {reason}")]
    RangeError { start: f64, end: f64, reason: String },

    #[error("Window {start}..{end} yields an empty or all-zero profile")]
    EmptyWindowError { start: f64, end: f64 },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    #[error("{0}")]
    Other(String),
}

impl XrdProfileError {
    /// 构造格式错误
    pub fn format(source_name: &str, reason: impl Into<String>) -> Self {
        XrdProfileError::FormatError {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }

    /// 构造范围错误
    pub fn range(start: f64, end: f64, reason: impl Into<String>) -> Self {
        XrdProfileError::RangeError {
            start,
            end,
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XrdProfileError>;
