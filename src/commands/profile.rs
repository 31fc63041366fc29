//! # profile 子命令实现
//!
//! 从 XRDML 文件提取角度窗口内的列/行剖面。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 并行计算（rayon）
//! - 输出叠加图像 (PNG/SVG) 或剖面数据 (CSV/XY)
//! - 可选简单立方参考峰位
//!
//! ## 依赖关系
//! - 使用 `cli/profile.rs` 定义的 ProfileArgs
//! - 使用 `parsers/` 读取扫描
//! - 使用 `profile/` 计算剖面
//! - 使用 `render/` 输出结果
//! - 使用 `batch/` 模块进行批量处理

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::profile::{parse_wavelength, ProfileArgs, ProfileOutputFormat};
use crate::error::{Result, XrdProfileError};
use crate::models::{ColumnProfile, ProfileWindow, RowProfile, Scan};
use crate::parsers;
use crate::profile::{
    extract_column_profile, extract_row_profile, reflections, Reflection, WindowPolicy,
};
use crate::render::{self, Figure, FigureOptions};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 已解析的处理参数（单文件与批量共享）
#[derive(Debug, Clone)]
struct ProfileJob {
    window: ProfileWindow,
    policy: WindowPolicy,
    xscale: f64,
    yscale: f64,
    reflections: Vec<Reflection>,
    title: Option<String>,
    legacy_label: bool,
    width: u32,
    height: u32,
}

/// 单个扫描的处理结果
struct ScanOutcome {
    scan: Scan,
    column: ColumnProfile,
    row: RowProfile,
}

/// 执行剖面提取
pub fn execute(args: ProfileArgs) -> Result<()> {
    output::print_header("Diffraction Scan Profile Extraction");

    let job = prepare_job(&args)?;

    if args.input.is_file() {
        execute_single_file(&args, &job)
    } else if args.input.is_dir() {
        execute_batch(&args, &job)
    } else {
        Err(XrdProfileError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 解析窗口、波长和参考峰位
fn prepare_job(args: &ProfileArgs) -> Result<ProfileJob> {
    let window = parse_window(&args.window)?;

    let reflections = match args.cubic_d {
        Some(d) => {
            let wavelength =
                parse_wavelength(&args.wavelength).map_err(XrdProfileError::InvalidArgument)?;
            let peaks = reflections::simple_cubic(d, wavelength, reflections::DEFAULT_MAX_ORDER)?;
            log::info!(
                "{} simple-cubic reflections for d = {} Å, λ = {} Å",
                peaks.len(),
                d,
                wavelength
            );
            peaks
        }
        None => Vec::new(),
    };

    let policy = if args.clamp {
        WindowPolicy::Clamp
    } else {
        WindowPolicy::Strict
    };

    Ok(ProfileJob {
        window,
        policy,
        xscale: args.xscale,
        yscale: args.yscale,
        reflections,
        title: args.title.clone(),
        legacy_label: args.legacy_label,
        width: args.width,
        height: args.height,
    })
}

/// 单文件模式
fn execute_single_file(args: &ProfileArgs, job: &ProfileJob) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));
    output::print_info(&format!(
        "Window: {} - {}",
        job.window.start_angle, job.window.end_angle
    ));

    let output_path = output_location(args.output.as_deref(), &args.input, false);
    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&output_path));

    let outcome = process_scan(&args.input, &output_path, format, job)?;

    output::print_success(&format!(
        "Loaded scan: {} ({} channels x {} steps)",
        outcome.scan.name(),
        outcome.scan.grid.n_rows(),
        outcome.scan.grid.n_cols()
    ));
    print_profile_table(&outcome, job);
    output::print_success(&format!("Profile saved to '{}'", output_path.display()));

    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &ProfileArgs, job: &ProfileJob) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} scan files", files.len()));

    let output_dir = output_location(args.output.as_deref(), &args.input, true);
    fs::create_dir_all(&output_dir).map_err(|e| XrdProfileError::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;
    output::print_info(&format!("Output directory: '{}'", output_dir.display()));

    let format = args.format.unwrap_or(ProfileOutputFormat::Png);
    output::print_info(&format!("Output format: {:?}", format));

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| {
        process_batch_file(file, &output_dir, format, args.overwrite, job)
    })?;

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} files, {} success, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));
    output::print_failures(&result.failures, 10);

    Ok(())
}

/// 处理批量模式中的单个文件
fn process_batch_file(
    input: &Path,
    output_dir: &Path,
    format: ProfileOutputFormat,
    overwrite: bool,
    job: &ProfileJob,
) -> ProcessResult {
    let output_file = batch_output_path(input, output_dir, format);

    if output_file.exists() && !overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    match process_scan(input, &output_file, format, job) {
        Ok(outcome) => ProcessResult::Success(format!(
            "{} -> {} (centroid {:.4})",
            input.display(),
            output_file.display(),
            outcome.column.profile.centroid
        )),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 未指定 `-o` 时，单文件输出 `profile.png`，批量输出到输入目录下的 `profiles/`
fn output_location(output: Option<&Path>, input: &Path, batch: bool) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None if batch => input.join("profiles"),
        None => PathBuf::from("profile.png"),
    }
}

/// 批量模式的输出文件名 `<stem>_profile.<ext>`
fn batch_output_path(input: &Path, output_dir: &Path, format: ProfileOutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scan");
    output_dir.join(format!("{}_profile.{}", stem, format.extension()))
}

/// 加载扫描、提取剖面并写出结果
fn process_scan(
    input: &Path,
    output: &Path,
    format: ProfileOutputFormat,
    job: &ProfileJob,
) -> Result<ScanOutcome> {
    let scan = parsers::load_scan(input)?;

    let column = extract_column_profile(
        &scan.grid,
        &scan.calibration,
        &job.window,
        job.policy,
        job.xscale,
    )?;
    let row = extract_row_profile(
        &scan.grid,
        &scan.calibration,
        &job.window,
        job.policy,
        job.yscale,
    )?;

    match format {
        ProfileOutputFormat::Png | ProfileOutputFormat::Svg => {
            let x_label = if job.legacy_label {
                scan.calibration.legacy_label()
            } else {
                scan.calibration.label()
            };
            let options = FigureOptions {
                title: job.title.clone().unwrap_or_else(|| scan.name()),
                x_label,
                width: job.width,
                height: job.height,
                use_svg: format == ProfileOutputFormat::Svg,
            };
            let figure = Figure {
                grid: &scan.grid,
                calibration: &scan.calibration,
                column: &column,
                row: &row,
                reflections: &job.reflections,
            };
            render::plot::render_profile_figure(&figure, output, &options)?;
        }
        ProfileOutputFormat::Csv => render::export::profiles_to_csv(&column, &row, output)?,
        ProfileOutputFormat::Xy => render::export::profiles_to_xy(
            &scan.name(),
            &scan.calibration,
            &column,
            &row,
            output,
        )?,
    }

    Ok(ScanOutcome { scan, column, row })
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> ProfileOutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => ProfileOutputFormat::Svg,
        Some("csv") => ProfileOutputFormat::Csv,
        Some("xy") | Some("dat") | Some("txt") => ProfileOutputFormat::Xy,
        _ => ProfileOutputFormat::Png,
    }
}

/// 解析角度窗口，支持 `44-46`、`-2..3`、`44:46`、`44,46`
fn parse_window(input: &str) -> Result<ProfileWindow> {
    let text = input.trim();
    let invalid = || XrdProfileError::InvalidRange(text.to_string());

    let (start, end) = if let Some(parts) = text.split_once("..") {
        parts
    } else if let Some(parts) = text.split_once(':') {
        parts
    } else if let Some(parts) = text.split_once(',') {
        parts
    } else {
        // 第一个数字之后、且不属于指数部分的 '-' 才是分隔符
        let bytes = text.as_bytes();
        let pos = (1..bytes.len())
            .find(|&i| {
                bytes[i] == b'-' && (bytes[i - 1].is_ascii_digit() || bytes[i - 1] == b'.')
            })
            .ok_or_else(invalid)?;
        (&text[..pos], &text[pos + 1..])
    };

    let start: f64 = start.trim().parse().map_err(|_| invalid())?;
    let end: f64 = end.trim().parse().map_err(|_| invalid())?;

    if !start.is_finite() || !end.is_finite() || end <= start {
        return Err(XrdProfileError::InvalidRange(format!(
            "{} (must be START < END)",
            text
        )));
    }

    Ok(ProfileWindow::new(start, end))
}

/// 打印剖面结果表格
fn print_profile_table(outcome: &ScanOutcome, job: &ProfileJob) {
    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Quantity")]
        quantity: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let cal = &outcome.scan.calibration;
    let column = &outcome.column;
    let row = &outcome.row;
    let peak = column.profile.raw.iter().copied().max().unwrap_or(0);

    let rows = vec![
        SummaryRow {
            quantity: "Calibrated range".to_string(),
            value: format!(
                "{:.4} - {:.4} {}",
                cal.start_angle, cal.end_angle, cal.axis_unit
            ),
        },
        SummaryRow {
            quantity: "Window".to_string(),
            value: format!(
                "{:.4} - {:.4} {}",
                job.window.start_angle, job.window.end_angle, cal.axis_unit
            ),
        },
        SummaryRow {
            quantity: "Columns in window".to_string(),
            value: column.profile.values.len().to_string(),
        },
        SummaryRow {
            quantity: format!("Centroid ({})", cal.axis_name),
            value: format!("{:.4} {}", column.profile.centroid, cal.axis_unit),
        },
        SummaryRow {
            quantity: "Centroid (channel)".to_string(),
            value: format!("{:.3}", row.profile.centroid),
        },
        SummaryRow {
            quantity: "Peak column counts".to_string(),
            value: peak.to_string(),
        },
    ];

    output::print_header("Profile Summary");
    println!("{}", Table::new(&rows));

    if !job.reflections.is_empty() {
        output::print_info("Reference reflections (simple cubic):");
        for r in &job.reflections {
            output::print_value(&format!("n = {}", r.order), r.two_theta, "deg 2θ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const SCAN: &str = r#"<xrdMeasurement>
  <scan>
    <dataPoints>
      <positions axis="2Theta" unit="deg">
        <startPosition>40.0</startPosition>
        <endPosition>43.0</endPosition>
      </positions>
      <counts unit="counts">0 1 0</counts>
      <counts unit="counts">2 0 2</counts>
      <counts unit="counts">0 1 0</counts>
    </dataPoints>
  </scan>
</xrdMeasurement>
"#;

    fn job(window: ProfileWindow) -> ProfileJob {
        ProfileJob {
            window,
            policy: WindowPolicy::Strict,
            xscale: 1.0,
            yscale: 0.8,
            reflections: Vec::new(),
            title: None,
            legacy_label: false,
            width: 400,
            height: 300,
        }
    }

    fn scan_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCAN.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("44-46").unwrap(), ProfileWindow::new(44.0, 46.0));
        assert_eq!(parse_window("-2..3").unwrap(), ProfileWindow::new(-2.0, 3.0));
        assert_eq!(parse_window("-5--2").unwrap(), ProfileWindow::new(-5.0, -2.0));
        assert_eq!(parse_window("44.5:46").unwrap(), ProfileWindow::new(44.5, 46.0));
        assert_eq!(parse_window(" 1, 2 ").unwrap(), ProfileWindow::new(1.0, 2.0));
        assert_eq!(parse_window("1e-3-2").unwrap(), ProfileWindow::new(0.001, 2.0));
    }

    #[test]
    fn test_parse_window_invalid() {
        for input in ["46-44", "44", "a-b", "44-44", ""] {
            assert!(
                matches!(parse_window(input), Err(XrdProfileError::InvalidRange(_))),
                "'{}' should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_guess_format() {
        assert_eq!(guess_format_from_extension(Path::new("a.svg")), ProfileOutputFormat::Svg);
        assert_eq!(guess_format_from_extension(Path::new("a.CSV")), ProfileOutputFormat::Csv);
        assert_eq!(guess_format_from_extension(Path::new("a.dat")), ProfileOutputFormat::Xy);
        assert_eq!(guess_format_from_extension(Path::new("a")), ProfileOutputFormat::Png);
    }

    #[test]
    fn test_output_location_defaults() {
        let input = Path::new("scans");
        assert_eq!(output_location(None, input, false), PathBuf::from("profile.png"));
        assert_eq!(output_location(None, input, true), input.join("profiles"));
        assert_eq!(
            output_location(Some(Path::new("out")), input, true),
            PathBuf::from("out")
        );
    }

    #[test]
    fn test_process_scan_to_csv() {
        let file = scan_file();
        let dir = tempdir().unwrap();
        let out = dir.path().join("profile.csv");

        let outcome = process_scan(
            file.path(),
            &out,
            ProfileOutputFormat::Csv,
            &job(ProfileWindow::new(40.0, 43.0)),
        )
        .unwrap();

        assert!((outcome.column.profile.centroid - 41.5).abs() < 1e-12);
        assert!((outcome.row.profile.centroid - 0.5).abs() < 1e-12);
        assert!(out.exists());
    }

    #[test]
    fn test_process_scan_range_error() {
        let file = scan_file();
        let dir = tempdir().unwrap();
        let out = dir.path().join("profile.xy");

        let result = process_scan(
            file.path(),
            &out,
            ProfileOutputFormat::Xy,
            &job(ProfileWindow::new(44.0, 46.0)),
        );
        assert!(matches!(result, Err(XrdProfileError::RangeError { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn test_process_scan_clamp_policy() {
        let file = scan_file();
        let dir = tempdir().unwrap();
        let out = dir.path().join("profile.csv");

        let mut clamped = job(ProfileWindow::new(38.0, 41.0));
        clamped.policy = WindowPolicy::Clamp;
        let outcome = process_scan(file.path(), &out, ProfileOutputFormat::Csv, &clamped).unwrap();

        assert_eq!(outcome.column.profile.raw, vec![2]);
        assert_eq!(outcome.row.profile.raw, vec![0, 2, 0]);
        assert!(out.exists());
    }

    #[test]
    fn test_batch_file_skips_existing_output() {
        let file = scan_file();
        let dir = tempdir().unwrap();
        let existing = batch_output_path(file.path(), dir.path(), ProfileOutputFormat::Xy);
        fs::write(&existing, "old").unwrap();

        let job = job(ProfileWindow::new(40.0, 43.0));
        let skipped =
            process_batch_file(file.path(), dir.path(), ProfileOutputFormat::Xy, false, &job);
        assert!(matches!(skipped, ProcessResult::Skipped(_)));

        let redone =
            process_batch_file(file.path(), dir.path(), ProfileOutputFormat::Xy, true, &job);
        assert!(matches!(redone, ProcessResult::Success(_)));
        assert_ne!(fs::read_to_string(&existing).unwrap(), "old");
    }
}
