//! # 解析器模块
//!
//! 解析衍射仪 XRDML 数据文件：强度网格与角度轴标定分别独立扫描文件。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: counts, calibration

pub mod calibration;
pub mod counts;

use crate::error::{Result, XrdProfileError};
use crate::models::Scan;

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

/// 加载完整扫描（强度网格 + 角度轴标定）
pub fn load_scan(path: &Path) -> Result<Scan> {
    let grid = counts::decode_counts_file(path)?;
    let calibration = calibration::decode_calibration_file(path)?;

    log::info!(
        "Loaded '{}': {} channels x {} steps, {} {:.3}..{:.3} {}",
        path.display(),
        grid.n_rows(),
        grid.n_cols(),
        calibration.axis_name,
        calibration.start_angle,
        calibration.end_angle,
        calibration.axis_unit
    );

    Ok(Scan {
        path: path.to_path_buf(),
        grid,
        calibration,
    })
}

/// 打开文件并包装为带缓冲的读取器
fn open_reader(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => XrdProfileError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => XrdProfileError::FileReadError {
            path: path.display().to_string(),
            source: e,
        },
    })?;
    Ok(BufReader::new(file))
}
