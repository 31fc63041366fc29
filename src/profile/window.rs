//! # 角度窗口映射
//!
//! 将物理角度窗口映射为数组列索引区间 `[j0, j1)`。
//!
//! ## 映射公式
//! ```text
//! j = floor((angle - start) * n_cols / (end - start))
//! ```
//! 与整数相差不到 1e-9 的结果会先取整，保证完整范围精确映射到 `[0, n_cols)`。
//!
//! ## 依赖关系
//! - 被 `profile/extractor.rs` 使用
//! - 使用 `models/` 的 AxisCalibration, ProfileWindow

use crate::error::{Result, XrdProfileError};
use crate::models::{AxisCalibration, ProfileWindow};

/// 浮点取整容差（以列为单位）
const INDEX_EPSILON: f64 = 1e-9;

/// 窗口越界处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPolicy {
    /// 越界即报 `RangeError`
    #[default]
    Strict,
    /// 先与标定范围求交集；完全不重叠时仍报 `RangeError`
    Clamp,
}

/// 窗口映射结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    /// 起始列（含）
    pub start: usize,
    /// 终止列（不含）
    pub end: usize,
    /// 实际使用的窗口（Clamp 策略下可能被收窄）
    pub window: ProfileWindow,
}

impl ColumnRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// 将角度窗口映射为列索引区间
pub fn map_window(
    calibration: &AxisCalibration,
    n_cols: usize,
    window: &ProfileWindow,
    policy: WindowPolicy,
) -> Result<ColumnRange> {
    let (start, end) = (window.start_angle, window.end_angle);

    if !start.is_finite() || !end.is_finite() {
        return Err(XrdProfileError::range(
            start,
            end,
            "window bounds must be finite",
        ));
    }
    if start > end {
        return Err(XrdProfileError::range(
            start,
            end,
            "window start must not exceed window end",
        ));
    }

    let (cal_start, cal_end) = (calibration.start_angle, calibration.end_angle);
    let tolerance = INDEX_EPSILON * calibration.span();

    let effective = match policy {
        WindowPolicy::Strict => {
            if start < cal_start - tolerance || end > cal_end + tolerance {
                return Err(XrdProfileError::range(
                    start,
                    end,
                    format!(
                        "calibrated range is {}..{} {}",
                        cal_start, cal_end, calibration.axis_unit
                    ),
                ));
            }
            *window
        }
        WindowPolicy::Clamp => {
            let disjoint = end < cal_start
                || start > cal_end
                || (end > start && (end <= cal_start || start >= cal_end));
            if disjoint {
                return Err(XrdProfileError::range(
                    start,
                    end,
                    format!(
                        "window does not overlap calibrated range {}..{} {}",
                        cal_start, cal_end, calibration.axis_unit
                    ),
                ));
            }
            let clamped = ProfileWindow::new(start.max(cal_start), end.min(cal_end));
            if clamped != *window {
                log::warn!(
                    "Window {}..{} clamped to {}..{}",
                    start,
                    end,
                    clamped.start_angle,
                    clamped.end_angle
                );
            }
            clamped
        }
    };

    let range = ColumnRange {
        start: column_index(calibration, n_cols, effective.start_angle),
        end: column_index(calibration, n_cols, effective.end_angle),
        window: effective,
    };

    if range.is_empty() {
        return Err(XrdProfileError::EmptyWindowError { start, end });
    }

    Ok(range)
}

/// 单个角度对应的列索引，结果限制在 `[0, n_cols]`
fn column_index(calibration: &AxisCalibration, n_cols: usize, angle: f64) -> usize {
    let position = (angle - calibration.start_angle) / calibration.span() * n_cols as f64;
    let snapped = if (position - position.round()).abs() < INDEX_EPSILON {
        position.round()
    } else {
        position.floor()
    };
    snapped.clamp(0.0, n_cols as f64) as usize
}
