//! # 扫描数据模型
//!
//! 定义二维强度网格 (`IntensityGrid`) 和角度轴标定 (`AxisCalibration`)。
//!
//! ## 约定
//! - 行 = 探测器通道（顺序与文件一致）
//! - 列 = 角度步进
//! - 第 j 列对应角度 `start + j * (end - start) / n_cols`
//!
//! ## 依赖关系
//! - 被 `parsers/` 创建
//! - 被 `profile/` 和 `render/` 使用

use std::path::PathBuf;

/// 二维强度网格（矩形，加载后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityGrid {
    rows: Vec<Vec<u32>>,
    n_cols: usize,
}

impl IntensityGrid {
    /// 从行数据构造网格
    ///
    /// 行列表为空或任一行长度不一致时返回 `None`，由调用者转换为格式错误。
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Option<Self> {
        let n_cols = rows.first()?.len();
        if n_cols == 0 || rows.iter().any(|r| r.len() != n_cols) {
            return None;
        }
        Some(Self { rows, n_cols })
    }

    /// 行数（探测器通道数）
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// 列数（角度步数）
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// 按文件顺序遍历各行（探测器通道）
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// 最大计数值
    pub fn max_count(&self) -> u32 {
        self.rows
            .iter()
            .flat_map(|r| r.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// 总计数
    pub fn total_counts(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|r| r.iter())
            .map(|&v| v as u64)
            .sum()
    }

    /// 半高度（用于以通道中心为零点的坐标）
    pub fn half_height(&self) -> f64 {
        self.n_rows() as f64 / 2.0
    }
}

/// 角度轴标定
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCalibration {
    /// 起始角度（如 2θ，单位见 `axis_unit`）
    pub start_angle: f64,
    /// 终止角度
    pub end_angle: f64,
    /// 轴名称（如 "2Theta"）
    pub axis_name: String,
    /// 轴单位（如 "deg"）
    pub axis_unit: String,
}

impl AxisCalibration {
    /// 角度范围宽度
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// 给定列数下的步长
    pub fn step(&self, n_cols: usize) -> f64 {
        self.span() / n_cols as f64
    }

    /// 第 j 列对应的物理角度
    pub fn angle_at(&self, col: usize, n_cols: usize) -> f64 {
        self.start_angle + col as f64 * self.step(n_cols)
    }

    /// 轴标签 `"<name> (<unit>)"`
    pub fn label(&self) -> String {
        format!("{} ({})", self.axis_name, self.axis_unit)
    }

    /// 旧版轴标签 `"<name> (<name>)"`，与旧脚本输出保持一致
    pub fn legacy_label(&self) -> String {
        format!("{} ({})", self.axis_name, self.axis_name)
    }
}

/// 一次完整加载的扫描
#[derive(Debug, Clone)]
pub struct Scan {
    /// 源文件路径
    pub path: PathBuf,
    pub grid: IntensityGrid,
    pub calibration: AxisCalibration,
}

impl Scan {
    /// 扫描名称（文件名去扩展名）
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scan")
            .to_string()
    }
}
