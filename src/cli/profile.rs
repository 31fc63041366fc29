//! # profile 子命令 CLI 定义
//!
//! 在角度窗口内提取列/行剖面，输出叠加图或剖面数据。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/profile.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 预定义辐射源波长 (Å)
pub fn get_predefined_wavelength(name: &str) -> Option<f64> {
    match name.to_lowercase().replace('_', "-").as_str() {
        "cu-ka" | "cuka" => Some(1.5418),
        "cu-ka1" | "cuka1" => Some(1.5406),
        "cu-ka2" | "cuka2" => Some(1.5444),
        "cu-kb1" | "cukb1" => Some(1.3922),
        "mo-ka" | "moka" => Some(0.7107),
        "mo-ka1" | "moka1" => Some(0.7093),
        "co-ka" | "coka" => Some(1.7903),
        "fe-ka" | "feka" => Some(1.9373),
        "cr-ka" | "crka" => Some(2.2910),
        "ag-ka" | "agka" => Some(0.5609),
        _ => None,
    }
}

/// 解析波长输入（辐射源名称或数值 Å）
pub fn parse_wavelength(input: &str) -> Result<f64, String> {
    if let Some(wl) = get_predefined_wavelength(input) {
        return Ok(wl);
    }
    match input.trim().parse::<f64>() {
        Ok(wl) if wl > 0.0 && wl.is_finite() => Ok(wl),
        _ => Err(format!(
            "Invalid wavelength '{}'. Use a positive number in Å (e.g., 1.54) or a name: cu-ka, mo-ka, co-ka, fe-ka, cr-ka, ag-ka",
            input
        )),
    }
}

/// 剖面输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ProfileOutputFormat {
    /// PNG image: heatmap with profile overlays
    Png,
    /// SVG vector image: heatmap with profile overlays
    Svg,
    /// CSV data file (profile, position, normalized, raw)
    Csv,
    /// XY data file (two commented blocks)
    Xy,
}

impl ProfileOutputFormat {
    /// 输出文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            ProfileOutputFormat::Png => "png",
            ProfileOutputFormat::Svg => "svg",
            ProfileOutputFormat::Csv => "csv",
            ProfileOutputFormat::Xy => "xy",
        }
    }
}

/// profile 子命令参数
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Input: XRDML file or directory containing XRDML files
    pub input: PathBuf,

    /// Angular window START-END in calibration units (e.g., "44-46" or "-2..3")
    #[arg(
        short,
        long,
        default_value = "44-46",
        env = "XRDPROFILE_WINDOW",
        allow_hyphen_values = true
    )]
    pub window: String,

    /// Scale of the column-profile overlay drawn above the heatmap
    #[arg(long, default_value_t = 1.0)]
    pub xscale: f64,

    /// Scale of the row-profile overlay drawn right of the window
    #[arg(long, default_value_t = 0.8)]
    pub yscale: f64,

    /// Clamp the window to the calibrated range instead of failing
    #[arg(long, default_value_t = false)]
    pub clamp: bool,

    /// Output: file path (single mode, default profile.png) or directory
    /// (batch mode, default <INPUT>/profiles)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<ProfileOutputFormat>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot (default: scan file name)
    #[arg(long)]
    pub title: Option<String>,

    /// Use the legacy "<name> (<name>)" axis label format
    #[arg(long, default_value_t = false)]
    pub legacy_label: bool,

    // ─────────────────────────────────────────────────────────────
    // 参考峰位
    // ─────────────────────────────────────────────────────────────
    /// Mark simple-cubic reflections for this d spacing (Å)
    #[arg(long)]
    pub cubic_d: Option<f64>,

    /// X-ray wavelength for reflections: source name (cu-ka, mo-ka, ...) or value in Å
    #[arg(long, default_value = "cu-ka")]
    pub wavelength: String,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, comma separated)
    #[arg(long, default_value = "*.xrdml")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0, env = "XRDPROFILE_JOBS")]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files (batch mode)
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
