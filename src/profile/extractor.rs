//! # 剖面提取器
//!
//! 在用户选择的角度窗口内计算两个正交的一维投影。
//!
//! ## 算法概述
//! 1. 窗口映射为列区间 `[j0, j1)`（见 `profile/window.rs`）
//! 2. 列剖面：每列对所有行求和；行剖面：每行对窗口内的列求和
//! 3. 计算强度加权质心（角度或通道坐标）
//! 4. 按最大值归一化，生成叠加绘图用的线段
//!
//! ## 坐标约定
//! - 热图纵轴范围 `[-n_rows/2, +n_rows/2]`，第 0 行在上边缘
//! - 列剖面的角度轴取窗口端点间的等距采样 `linspace(start, end, len)`，
//!   与逐列真实角度仅在区间边界处一一对应
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs` 调用
//! - 使用 `models/` 的 IntensityGrid, AxisCalibration, ProfileWindow
//! - 使用 `profile/window.rs` 做索引映射

use crate::error::{Result, XrdProfileError};
use crate::models::{
    AxisCalibration, ColumnProfile, IntensityGrid, Profile, ProfileWindow, RowProfile, Segment,
};
use crate::profile::window::{self, ColumnRange, WindowPolicy};

/// 列剖面归一化参考幅度
pub const REFERENCE_AMPLITUDE: f64 = 128.0;

/// 计算列剖面（沿角度轴）
///
/// 每列对所有行求和，按 `REFERENCE_AMPLITUDE` 归一化，质心取在窗口等距采样的角度上。
pub fn extract_column_profile(
    grid: &IntensityGrid,
    calibration: &AxisCalibration,
    window: &ProfileWindow,
    policy: WindowPolicy,
    scale: f64,
) -> Result<ColumnProfile> {
    let range = window::map_window(calibration, grid.n_cols(), window, policy)?;

    let raw: Vec<u64> = (range.start..range.end)
        .map(|j| grid.rows().map(|row| row[j] as u64).sum::<u64>())
        .collect();

    let values = normalize(&raw, REFERENCE_AMPLITUDE, &range)?;
    let angles = linspace(
        range.window.start_angle,
        range.window.end_angle,
        values.len(),
    );
    let centroid = weighted_mean(&angles, &raw);

    let half = grid.half_height();
    let centroid_line = Segment::line((centroid, -half), (centroid, half));
    let marker_line =
        Segment::line((centroid, half), (centroid, half + REFERENCE_AMPLITUDE * scale));
    let overlay = Segment {
        points: angles
            .iter()
            .zip(&values)
            .map(|(&angle, &v)| (angle, v * scale + half))
            .collect(),
    };

    log::debug!(
        "Column profile: {} columns from {}, centroid {:.4}",
        range.len(),
        range.start,
        centroid
    );

    Ok(ColumnProfile {
        profile: Profile {
            values,
            raw,
            centroid,
        },
        angles,
        centroid_line,
        marker_line,
        overlay,
    })
}

/// 计算行剖面（沿探测器通道）
pub fn extract_row_profile(
    grid: &IntensityGrid,
    calibration: &AxisCalibration,
    window: &ProfileWindow,
    policy: WindowPolicy,
    scale: f64,
) -> Result<RowProfile> {
    let range = window::map_window(calibration, grid.n_cols(), window, policy)?;

    let raw: Vec<u64> = grid
        .rows()
        .map(|row| {
            row[range.start..range.end]
                .iter()
                .map(|&v| v as u64)
                .sum::<u64>()
        })
        .collect();

    let values = normalize(&raw, 1.0, &range)?;

    // 以通道中心为零点，取负号使第 0 行位于上方
    let half = grid.half_height();
    let offsets: Vec<f64> = (0..raw.len()).map(|i| i as f64 - half).collect();
    let centroid = -weighted_mean(&offsets, &raw);
    let channels: Vec<f64> = offsets.iter().map(|o| -o).collect();

    let w = range.window;
    let centroid_line = Segment::line((w.start_angle, centroid), (w.end_angle, centroid));
    let overlay = Segment {
        points: values
            .iter()
            .zip(&channels)
            .map(|(&v, &y)| (w.end_angle + scale * w.span() * v, y))
            .collect(),
    };

    log::debug!(
        "Row profile: columns {}..{}, centroid {:.4}",
        range.start,
        range.end,
        centroid
    );

    Ok(RowProfile {
        profile: Profile {
            values,
            raw,
            centroid,
        },
        channels,
        centroid_line,
        overlay,
    })
}

/// 归一化到给定幅度；空剖面或全零剖面报 `EmptyWindowError`
fn normalize(raw: &[u64], amplitude: f64, range: &ColumnRange) -> Result<Vec<f64>> {
    let max = raw.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Err(XrdProfileError::EmptyWindowError {
            start: range.window.start_angle,
            end: range.window.end_angle,
        });
    }
    let max = max as f64;
    Ok(raw.iter().map(|&v| amplitude * v as f64 / max).collect())
}

/// 等距采样，`n == 1` 时只返回起点
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|k| start + k as f64 * step).collect()
        }
    }
}

/// 加权平均；调用前已保证权重和非零
fn weighted_mean(positions: &[f64], weights: &[u64]) -> f64 {
    let total: f64 = weights.iter().map(|&w| w as f64).sum();
    positions
        .iter()
        .zip(weights)
        .map(|(&x, &w)| x * w as f64)
        .sum::<f64>()
        / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const STRICT: WindowPolicy = WindowPolicy::Strict;

    fn grid(rows: Vec<Vec<u32>>) -> IntensityGrid {
        IntensityGrid::from_rows(rows).unwrap()
    }

    fn calibration(start: f64, end: f64) -> AxisCalibration {
        AxisCalibration {
            start_angle: start,
            end_angle: end,
            axis_name: "2Theta".to_string(),
            axis_unit: "deg".to_string(),
        }
    }

    fn full_window() -> ProfileWindow {
        ProfileWindow::new(40.0, 43.0)
    }

    fn cross_grid() -> IntensityGrid {
        grid(vec![vec![0, 1, 0], vec![2, 0, 2], vec![0, 1, 0]])
    }

    #[test]
    fn test_column_profile_symmetric_scenario() {
        let cal = calibration(40.0, 43.0);
        let result =
            extract_column_profile(&cross_grid(), &cal, &full_window(), STRICT, 1.0).unwrap();

        assert_eq!(result.profile.raw, vec![2, 2, 2]);
        assert_eq!(result.profile.values, vec![128.0, 128.0, 128.0]);
        assert_relative_eq!(result.profile.centroid, 41.5, epsilon = 1e-12);
        assert_eq!(result.angles, vec![40.0, 41.5, 43.0]);
    }

    #[test]
    fn test_column_profile_overlay_lines() {
        let cal = calibration(40.0, 43.0);
        let result =
            extract_column_profile(&cross_grid(), &cal, &full_window(), STRICT, 0.5).unwrap();

        let c = result.profile.centroid;
        assert_eq!(result.centroid_line.points, vec![(c, -1.5), (c, 1.5)]);
        assert_eq!(result.marker_line.points, vec![(c, 1.5), (c, 1.5 + 64.0)]);
        assert_eq!(result.overlay.points.len(), 3);
        for &(_, y) in &result.overlay.points {
            assert_relative_eq!(y, 64.0 + 1.5);
        }
    }

    #[test]
    fn test_column_profile_peak_centroid() {
        // 峰值在第 6 列（真实角度 46.0，等距采样下为 46.5）
        let mut row = vec![0u32; 10];
        row[5] = 1;
        row[6] = 10;
        row[7] = 1;
        let g = grid(vec![row.clone(), row.clone(), row]);
        let cal = calibration(40.0, 50.0);
        let window = ProfileWindow::new(44.0, 49.0);
        let result = extract_column_profile(&g, &cal, &window, STRICT, 1.0).unwrap();

        assert_eq!(result.profile.values.len(), 5);
        assert_eq!(result.profile.values[2], REFERENCE_AMPLITUDE);
        assert!(result.profile.centroid >= window.start_angle);
        assert!(result.profile.centroid <= window.end_angle);
        assert_relative_eq!(result.profile.centroid, 46.5, epsilon = 1e-12);
    }

    #[test]
    fn test_row_profile_scenario() {
        let cal = calibration(40.0, 43.0);
        let result =
            extract_row_profile(&cross_grid(), &cal, &full_window(), STRICT, 0.8).unwrap();

        assert_eq!(result.profile.raw, vec![1, 4, 1]);
        assert_eq!(result.profile.values, vec![0.25, 1.0, 0.25]);
        // 平均行号 1，减去半高 1.5 后取负
        assert_relative_eq!(result.profile.centroid, 0.5, epsilon = 1e-12);
        assert_eq!(result.channels, vec![1.5, 0.5, -0.5]);
        assert_eq!(
            result.centroid_line.points,
            vec![(40.0, 0.5), (43.0, 0.5)]
        );
        let (x_peak, y_peak) = result.overlay.points[1];
        assert_relative_eq!(x_peak, 43.0 + 0.8 * 3.0);
        assert_relative_eq!(y_peak, 0.5);
    }

    #[test]
    fn test_row_profile_top_heavy_is_positive() {
        let g = grid(vec![vec![9, 9], vec![1, 1], vec![0, 0], vec![0, 0]]);
        let cal = calibration(0.0, 2.0);
        let window = ProfileWindow::new(0.0, 2.0);
        let result = extract_row_profile(&g, &cal, &window, STRICT, 1.0).unwrap();
        assert!(result.profile.centroid > 0.0);
    }

    #[test]
    fn test_row_profile_uses_window_columns_only() {
        let g = grid(vec![vec![5, 0, 0], vec![0, 0, 7]]);
        let cal = calibration(0.0, 3.0);
        let window = ProfileWindow::new(2.0, 3.0);
        let result = extract_row_profile(&g, &cal, &window, STRICT, 1.0).unwrap();
        assert_eq!(result.profile.raw, vec![0, 7]);
    }

    #[test]
    fn test_all_zero_window_is_empty_error() {
        let g = grid(vec![vec![0, 0, 5], vec![0, 0, 5]]);
        let cal = calibration(0.0, 3.0);
        let window = ProfileWindow::new(0.0, 2.0);

        assert!(matches!(
            extract_column_profile(&g, &cal, &window, STRICT, 1.0),
            Err(XrdProfileError::EmptyWindowError { .. })
        ));
        assert!(matches!(
            extract_row_profile(&g, &cal, &window, STRICT, 1.0),
            Err(XrdProfileError::EmptyWindowError { .. })
        ));
    }

    #[test]
    fn test_out_of_range_window_strict_vs_clamp() {
        let cal = calibration(40.0, 43.0);
        let window = ProfileWindow::new(38.0, 41.0);

        assert!(matches!(
            extract_column_profile(&cross_grid(), &cal, &window, STRICT, 1.0),
            Err(XrdProfileError::RangeError { .. })
        ));

        let clamped =
            extract_column_profile(&cross_grid(), &cal, &window, WindowPolicy::Clamp, 1.0)
                .unwrap();
        assert_eq!(clamped.profile.raw, vec![2]);
        assert_eq!(clamped.angles, vec![40.0]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let cal = calibration(40.0, 43.0);
        let window = ProfileWindow::new(40.0, 42.0);
        let a = extract_column_profile(&cross_grid(), &cal, &window, STRICT, 1.0).unwrap();
        let b = extract_column_profile(&cross_grid(), &cal, &window, STRICT, 1.0).unwrap();
        assert_eq!(a.profile, b.profile);
        assert_eq!(a.overlay, b.overlay);
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }
}
