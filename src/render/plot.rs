//! # 剖面图表生成
//!
//! 使用 `plotters` 库绘制二维强度热图，并叠加列/行剖面。
//!
//! ## 图层
//! - jet 色图热图，范围 `[start, end] × [-n_rows/2, +n_rows/2]`，第 0 行在上
//! - y = 0 白色参考线
//! - 列剖面：白色虚线质心、黑色质心标记、黑色剖面曲线（热图上方）
//! - 行剖面：白色虚线质心、白色剖面曲线（窗口右侧）
//! - 可选参考峰位 `+` 标记
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs` 调用
//! - 使用 `models/` 的 IntensityGrid, AxisCalibration, ColumnProfile, RowProfile
//! - 使用 `render/colormap.rs`

use crate::error::{Result, XrdProfileError};
use crate::models::{AxisCalibration, ColumnProfile, IntensityGrid, RowProfile};
use crate::profile::Reflection;
use crate::render::colormap;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::Path;

/// 一张图所需的全部数据
pub struct Figure<'a> {
    pub grid: &'a IntensityGrid,
    pub calibration: &'a AxisCalibration,
    pub column: &'a ColumnProfile,
    pub row: &'a RowProfile,
    pub reflections: &'a [Reflection],
}

/// 图表外观参数
#[derive(Debug, Clone)]
pub struct FigureOptions {
    pub title: String,
    pub x_label: String,
    pub width: u32,
    pub height: u32,
    pub use_svg: bool,
}

/// 生成剖面图表
pub fn render_profile_figure(
    figure: &Figure<'_>,
    output_path: &Path,
    options: &FigureOptions,
) -> Result<()> {
    let size = (options.width, options.height);
    if options.use_svg {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_figure(&root, figure, options)?;
        root.present().map_err(plot_error)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_figure(&root, figure, options)?;
        root.present().map_err(plot_error)?;
    }
    Ok(())
}

/// 绘制图表的核心逻辑
fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    figure: &Figure<'_>,
    options: &FigureOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_error)?;

    let grid = figure.grid;
    let cal = figure.calibration;
    let half = grid.half_height();

    let ((x_min, x_max), (y_min, y_max)) = figure_bounds(figure);

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(options.x_label.as_str())
        .y_desc("Channel")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_error)?;

    // 热图
    let max_count = grid.max_count().max(1) as f64;
    let n_cols = grid.n_cols();
    chart
        .draw_series(grid.rows().enumerate().flat_map(|(i, row)| {
            let top = half - i as f64;
            row.iter().enumerate().map(move |(j, &count)| {
                Rectangle::new(
                    [
                        (cal.angle_at(j, n_cols), top),
                        (cal.angle_at(j + 1, n_cols), top - 1.0),
                    ],
                    colormap::jet(count as f64 / max_count).filled(),
                )
            })
        }))
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            vec![(cal.start_angle, 0.0), (cal.end_angle, 0.0)],
            WHITE.stroke_width(1),
        ))
        .map_err(plot_error)?;

    // 列剖面
    let column = figure.column;
    chart
        .draw_series(DashedLineSeries::new(
            column.centroid_line.points.iter().copied(),
            8,
            6,
            WHITE.stroke_width(2),
        ))
        .map_err(plot_error)?;
    chart
        .draw_series(LineSeries::new(
            column.marker_line.points.iter().copied(),
            BLACK.stroke_width(2),
        ))
        .map_err(plot_error)?;
    chart
        .draw_series(LineSeries::new(
            column.overlay.points.iter().copied(),
            BLACK.stroke_width(2),
        ))
        .map_err(plot_error)?;

    // 行剖面
    let row = figure.row;
    chart
        .draw_series(DashedLineSeries::new(
            row.centroid_line.points.iter().copied(),
            8,
            6,
            WHITE.stroke_width(2),
        ))
        .map_err(plot_error)?;
    chart
        .draw_series(LineSeries::new(
            row.overlay.points.iter().copied(),
            WHITE.stroke_width(2),
        ))
        .map_err(plot_error)?;

    // 参考峰位，`+` 标记由一横一竖两段组成
    let arm = (0.008 * (x_max - x_min), 0.015 * (y_max - y_min));
    chart
        .draw_series(
            figure
                .reflections
                .iter()
                .filter(|r| r.two_theta >= x_min && r.two_theta <= cal.end_angle)
                .flat_map(|r| plus_marker((r.two_theta, 0.0), arm))
                .map(|path| PathElement::new(path, WHITE.stroke_width(2))),
        )
        .map_err(plot_error)?;

    let centroid_text = format!(
        "{} = {:.4}, channel = {:.2}",
        cal.axis_name, column.profile.centroid, row.profile.centroid
    );
    chart
        .draw_series(std::iter::once(Text::new(
            centroid_text,
            (x_min + 0.02 * (x_max - x_min), y_max - 0.04 * (y_max - y_min)),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(plot_error)?;

    Ok(())
}

/// 以 `center` 为中心的 `+` 形标记：水平段与竖直段
fn plus_marker(center: (f64, f64), arm: (f64, f64)) -> [Vec<(f64, f64)>; 2] {
    let (x, y) = center;
    let (dx, dy) = arm;
    [vec![(x - dx, y), (x + dx, y)], vec![(x, y - dy), (x, y + dy)]]
}

/// 坐标轴范围：热图范围再加上超出热图的叠加曲线
fn figure_bounds(figure: &Figure<'_>) -> ((f64, f64), (f64, f64)) {
    let cal = figure.calibration;
    let half = figure.grid.half_height();

    let x_max = figure
        .row
        .overlay
        .points
        .iter()
        .map(|(x, _)| *x)
        .fold(cal.end_angle, f64::max);
    let y_max = figure
        .column
        .overlay
        .points
        .iter()
        .chain(&figure.column.marker_line.points)
        .map(|(_, y)| *y)
        .fold(half, f64::max);

    ((cal.start_angle, x_max), (-half, y_max))
}

fn plot_error<E: std::fmt::Debug>(e: E) -> XrdProfileError {
    XrdProfileError::PlotError(format!("{:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileWindow;
    use crate::profile::{extract_column_profile, extract_row_profile, WindowPolicy};
    use approx::assert_relative_eq;

    #[test]
    fn test_figure_bounds_include_overlays() {
        let grid = IntensityGrid::from_rows(vec![
            vec![0, 1, 3, 1],
            vec![1, 4, 9, 2],
            vec![0, 2, 5, 1],
            vec![0, 0, 1, 0],
        ])
        .unwrap();
        let cal = AxisCalibration {
            start_angle: 40.0,
            end_angle: 44.0,
            axis_name: "2Theta".to_string(),
            axis_unit: "deg".to_string(),
        };
        let window = ProfileWindow::new(41.0, 44.0);
        let column = extract_column_profile(&grid, &cal, &window, WindowPolicy::Strict, 1.0).unwrap();
        let row = extract_row_profile(&grid, &cal, &window, WindowPolicy::Strict, 0.5).unwrap();
        let figure = Figure {
            grid: &grid,
            calibration: &cal,
            column: &column,
            row: &row,
            reflections: &[],
        };

        let ((x_min, x_max), (y_min, y_max)) = figure_bounds(&figure);
        assert_relative_eq!(x_min, 40.0);
        // 行剖面最大值位于 44 + 0.5 * 3
        assert_relative_eq!(x_max, 45.5);
        assert_relative_eq!(y_min, -2.0);
        // 列剖面标记顶端位于 2 + 128
        assert_relative_eq!(y_max, 130.0);
    }

    #[test]
    fn test_reflection_marker_is_plus_shaped() {
        let [horizontal, vertical] = plus_marker((44.5, 0.0), (0.25, 2.0));
        assert_eq!(horizontal, vec![(44.25, 0.0), (44.75, 0.0)]);
        assert_eq!(vertical, vec![(44.5, -2.0), (44.5, 2.0)]);
    }
}
