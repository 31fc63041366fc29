//! # jet 色图
//!
//! 把归一化强度 [0, 1] 映射为蓝 → 青 → 黄 → 红的颜色。

use plotters::style::RGBColor;

/// 将归一化值映射为 jet 颜色
pub fn jet(value: f64) -> RGBColor {
    let v = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    };
    RGBColor(
        channel(1.5 - (4.0 * v - 3.0).abs()),
        channel(1.5 - (4.0 * v - 2.0).abs()),
        channel(1.5 - (4.0 * v - 1.0).abs()),
    )
}

fn channel(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}
