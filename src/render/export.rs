//! # 剖面数据导出
//!
//! 导出列/行剖面到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: 长表格式 `profile,position,normalized,raw`，两个剖面写入同一文件
//! - XY: 两个以 `#` 注释分隔的数据块（列剖面、行剖面）
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs` 调用
//! - 使用 `models/` 的 ColumnProfile, RowProfile
//! - 使用 `csv` + `serde` 写入 CSV 文件

use crate::error::{Result, XrdProfileError};
use crate::models::{AxisCalibration, ColumnProfile, Profile, RowProfile};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV 中的一行
#[derive(Debug, Serialize)]
struct ProfileRecord<'a> {
    profile: &'a str,
    position: f64,
    normalized: f64,
    raw: u64,
}

fn records<'a>(
    name: &'a str,
    positions: &'a [f64],
    profile: &'a Profile,
) -> impl Iterator<Item = ProfileRecord<'a>> + 'a {
    positions
        .iter()
        .zip(profile.values.iter().zip(&profile.raw))
        .map(move |(&position, (&normalized, &raw))| ProfileRecord {
            profile: name,
            position,
            normalized,
            raw,
        })
}

/// 导出两个剖面为 CSV 格式
pub fn profiles_to_csv(column: &ColumnProfile, row: &RowProfile, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for record in records("column", &column.angles, &column.profile)
        .chain(records("row", &row.channels, &row.profile))
    {
        wtr.serialize(record)?;
    }

    wtr.flush().map_err(|e| XrdProfileError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出两个剖面为 XY 格式
pub fn profiles_to_xy(
    scan_name: &str,
    calibration: &AxisCalibration,
    column: &ColumnProfile,
    row: &RowProfile,
    output_path: &Path,
) -> Result<()> {
    let write_error = |e: std::io::Error| XrdProfileError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let file = File::create(output_path).map_err(write_error)?;
    let mut out = BufWriter::new(file);

    write_xy(&mut out, scan_name, calibration, column, row).map_err(write_error)?;
    out.flush().map_err(write_error)?;

    Ok(())
}

fn write_xy<W: Write>(
    out: &mut W,
    scan_name: &str,
    calibration: &AxisCalibration,
    column: &ColumnProfile,
    row: &RowProfile,
) -> std::io::Result<()> {
    writeln!(out, "# Scan: {}", scan_name)?;
    writeln!(
        out,
        "# Calibration: {} {:.6} - {:.6} {}",
        calibration.axis_name, calibration.start_angle, calibration.end_angle, calibration.axis_unit
    )?;
    writeln!(out, "#")?;

    writeln!(out, "# Column profile, centroid = {:.6}", column.profile.centroid)?;
    writeln!(
        out,
        "# Columns: {}, Intensity (0-128), Raw counts",
        calibration.label()
    )?;
    for ((angle, value), raw) in column
        .angles
        .iter()
        .zip(&column.profile.values)
        .zip(&column.profile.raw)
    {
        writeln!(out, "{:.4}\t{:.4}\t{}", angle, value, raw)?;
    }

    writeln!(out)?;
    writeln!(out, "# Row profile, centroid = {:.6}", row.profile.centroid)?;
    writeln!(out, "# Columns: Channel, Intensity (0-1), Raw counts")?;
    for ((channel, value), raw) in row
        .channels
        .iter()
        .zip(&row.profile.values)
        .zip(&row.profile.raw)
    {
        writeln!(out, "{:.1}\t{:.6}\t{}", channel, value, raw)?;
    }

    Ok(())
}
