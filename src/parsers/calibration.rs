//! # 角度轴标定解析器
//!
//! 从 XRDML 文件的 `<dataPoints>` 区段提取角度范围和轴信息。
//!
//! ## 格式说明
//! ```text
//! <dataPoints>
//!   <positions axis="2Theta" unit="deg">
//!     <startPosition>44.0</startPosition>
//!     <endPosition>46.0</endPosition>
//!   </positions>
//!   ...
//! ```
//! 区段标记之后紧接的三行分别给出轴名/单位、起始角和终止角。
//! 轴名和单位按属性名 (`axis`, `unit`) 查找，不依赖属性顺序。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/scan.rs`
//! - 使用 `regex` 解析属性

use crate::error::{Result, XrdProfileError};
use crate::models::AxisCalibration;

use regex::Regex;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::OnceLock;

/// 标定区段起始标记
const SECTION_MARKER: &str = "<dataPoints";

/// 区段内需要读取的行数
const SECTION_LINES: usize = 3;

/// 解析 XRDML 文件中的角度轴标定
pub fn decode_calibration_file(path: &Path) -> Result<AxisCalibration> {
    let reader = super::open_reader(path)?;
    decode_calibration(reader, &path.display().to_string())
}

/// 从任意行读取器解析角度轴标定
pub fn decode_calibration<R: BufRead>(reader: R, source_name: &str) -> Result<AxisCalibration> {
    let mut section: Vec<(usize, String)> = Vec::with_capacity(SECTION_LINES);
    let mut in_section = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| XrdProfileError::FileReadError {
            path: source_name.to_string(),
            source: e,
        })?;

        if in_section {
            section.push((idx + 1, line));
            if section.len() == SECTION_LINES {
                break;
            }
        } else if line.contains(SECTION_MARKER) {
            in_section = true;
        }
    }

    if !in_section {
        return Err(XrdProfileError::format(
            source_name,
            "Missing <dataPoints> calibration section",
        ));
    }
    if section.len() < SECTION_LINES {
        return Err(XrdProfileError::format(
            source_name,
            format!(
                "Calibration section has {} lines, expected {}",
                section.len(),
                SECTION_LINES
            ),
        ));
    }

    let (axis_line_no, axis_line) = &section[0];
    let attrs = parse_attributes(axis_line);
    let axis_name = attrs.get("axis").cloned().ok_or_else(|| {
        XrdProfileError::format(
            source_name,
            format!("line {}: missing axis=\"...\" attribute", axis_line_no),
        )
    })?;
    let axis_unit = attrs.get("unit").cloned().ok_or_else(|| {
        XrdProfileError::format(
            source_name,
            format!("line {}: missing unit=\"...\" attribute", axis_line_no),
        )
    })?;

    let start_angle = parse_tagged_value(&section[1], "startPosition", source_name)?;
    let end_angle = parse_tagged_value(&section[2], "endPosition", source_name)?;

    if start_angle >= end_angle {
        return Err(XrdProfileError::format(
            source_name,
            format!(
                "startPosition ({}) must be smaller than endPosition ({})",
                start_angle, end_angle
            ),
        ));
    }

    log::debug!(
        "{}: calibration {} {}..{} {}",
        source_name,
        axis_name,
        start_angle,
        end_angle,
        axis_unit
    );

    Ok(AxisCalibration {
        start_angle,
        end_angle,
        axis_name,
        axis_unit,
    })
}

/// 提取一行中所有 `name="value"` 属性
fn parse_attributes(line: &str) -> HashMap<String, String> {
    static ATTR_RE: OnceLock<Regex> = OnceLock::new();
    let re = ATTR_RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*"([^"]*)""#).expect("attribute pattern is valid")
    });

    re.captures_iter(line)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect()
}

/// 解析 `<tag>value</tag>` 中的浮点数值
fn parse_tagged_value(
    (line_no, line): &(usize, String),
    tag: &str,
    source_name: &str,
) -> Result<f64> {
    let open = format!("{}>", tag);
    let raw = line
        .split_once(open.as_str())
        .and_then(|(_, rest)| rest.split_once("</"))
        .map(|(value, _)| value.trim())
        .ok_or_else(|| {
            XrdProfileError::format(
                source_name,
                format!("line {}: expected <{}>value</{}>", line_no, tag, tag),
            )
        })?;

    let value: f64 = raw.parse().map_err(|_| {
        XrdProfileError::format(
            source_name,
            format!("line {}: invalid {} value '{}'", line_no, tag, raw),
        )
    })?;

    if !value.is_finite() {
        return Err(XrdProfileError::format(
            source_name,
            format!("line {}: {} is not finite", line_no, tag),
        ));
    }

    Ok(value)
}
