//! # 剖面数据模型
//!
//! 定义角度窗口、一维剖面以及用于叠加绘图的线段。
//!
//! ## 依赖关系
//! - 被 `profile/extractor.rs` 创建
//! - 被 `render/` 和 `commands/profile.rs` 使用

/// 用户选择的角度窗口 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileWindow {
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ProfileWindow {
    pub fn new(start_angle: f64, end_angle: f64) -> Self {
        Self {
            start_angle,
            end_angle,
        }
    }

    /// 窗口宽度
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// 一维剖面
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// 归一化后的剖面值
    pub values: Vec<f64>,
    /// 归一化前的求和值
    pub raw: Vec<u64>,
    /// 强度加权质心（物理单位：角度或通道）
    pub centroid: f64,
}

/// 绘图坐标系中的折线
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub points: Vec<(f64, f64)>,
}

impl Segment {
    /// 两点直线段
    pub fn line(from: (f64, f64), to: (f64, f64)) -> Self {
        Self {
            points: vec![from, to],
        }
    }
}

/// 列方向剖面（沿角度轴）及其叠加线
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub profile: Profile,
    /// 每个采样点的角度（窗口内等距）
    pub angles: Vec<f64>,
    /// 质心竖线，贯穿整个热图高度
    pub centroid_line: Segment,
    /// 质心标记，位于热图上方的叠加区域
    pub marker_line: Segment,
    /// 按 scale 缩放后放在热图上边缘的剖面曲线
    pub overlay: Segment,
}

/// 行方向剖面（沿探测器通道）及其叠加线
#[derive(Debug, Clone)]
pub struct RowProfile {
    pub profile: Profile,
    /// 每行对应的通道坐标（行 0 在上边缘）
    pub channels: Vec<f64>,
    /// 质心水平线，横跨窗口
    pub centroid_line: Segment,
    /// 按 scale 缩放后放在窗口右侧的剖面曲线
    pub overlay: Segment,
}
