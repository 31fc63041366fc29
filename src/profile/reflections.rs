//! # 参考衍射峰
//!
//! 计算简单立方晶格的 Bragg 峰位，用于在热图上标注。
//!
//! ```text
//! 2θ_n = 2 · asin(n · λ / (2d))
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs` 调用
//! - 结果交给 `render/plot.rs` 绘制

use crate::error::{Result, XrdProfileError};

/// 默认最高衍射级数
pub const DEFAULT_MAX_ORDER: u32 = 9;

/// 单个参考峰
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    /// 衍射级数 n
    pub order: u32,
    /// 衍射角 2θ（度）
    pub two_theta: f64,
}

/// 计算简单立方晶格 (d 间距) 在给定波长下的峰位
///
/// 只返回 `n·λ/(2d) <= 1` 的级数，结果按 2θ 升序排列。
pub fn simple_cubic(d_spacing: f64, wavelength: f64, max_order: u32) -> Result<Vec<Reflection>> {
    if d_spacing <= 0.0 || !d_spacing.is_finite() {
        return Err(XrdProfileError::InvalidArgument(format!(
            "d spacing must be a positive number, got {}",
            d_spacing
        )));
    }
    if wavelength <= 0.0 || !wavelength.is_finite() {
        return Err(XrdProfileError::InvalidArgument(format!(
            "wavelength must be a positive number, got {}",
            wavelength
        )));
    }

    let reflections = (1..=max_order)
        .map(|n| (n, n as f64 * wavelength / (2.0 * d_spacing)))
        .take_while(|&(_, sin_theta)| sin_theta <= 1.0)
        .map(|(order, sin_theta)| Reflection {
            order,
            two_theta: 2.0 * sin_theta.asin().to_degrees(),
        })
        .collect();

    Ok(reflections)
}
