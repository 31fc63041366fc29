//! # 强度数据解析器
//!
//! 从 XRDML 文件中逐行提取二维强度网格。
//!
//! ## 格式说明
//! ```text
//! <counts unit="counts">0 1 0 2 5 3 ...</counts>
//! <counts unit="counts">1 0 0 4 7 2 ...</counts>
//! ```
//! 每个 `<counts` 行是网格的一行（一个探测器通道），按文件顺序排列。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/scan.rs`

use crate::error::{Result, XrdProfileError};
use crate::models::IntensityGrid;

use std::io::BufRead;
use std::path::Path;

/// 数据行标记
const ROW_MARKER: &str = "<counts";

/// 解析 XRDML 文件中的强度网格
pub fn decode_counts_file(path: &Path) -> Result<IntensityGrid> {
    let reader = super::open_reader(path)?;
    decode_counts(reader, &path.display().to_string())
}

/// 从任意行读取器解析强度网格
pub fn decode_counts<R: BufRead>(reader: R, source_name: &str) -> Result<IntensityGrid> {
    let mut rows: Vec<Vec<u32>> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| XrdProfileError::FileReadError {
            path: source_name.to_string(),
            source: e,
        })?;

        if !line.contains(ROW_MARKER) {
            continue;
        }

        rows.push(parse_row(&line, line_no, source_name)?);
    }

    if rows.is_empty() {
        return Err(XrdProfileError::format(
            source_name,
            "No <counts> data rows found",
        ));
    }

    // 扫描结束后再检查矩形性，便于报告第一处不一致的行
    let expected = rows[0].len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(XrdProfileError::format(
            source_name,
            format!(
                "Data row {} has {} values, expected {} (grid must be rectangular)",
                i + 1,
                row.len(),
                expected
            ),
        ));
    }

    log::debug!(
        "{}: decoded {} x {} intensity grid",
        source_name,
        rows.len(),
        expected
    );

    IntensityGrid::from_rows(rows)
        .ok_or_else(|| XrdProfileError::format(source_name, "Data rows are empty"))
}

/// 解析单个 `<counts ...>v v v</counts>` 行
fn parse_row(line: &str, line_no: usize, source_name: &str) -> Result<Vec<u32>> {
    // 只在标记之后查找，避免被同一行前面的其他标签干扰
    let marker_pos = line.find(ROW_MARKER).unwrap_or(0);
    let tail = &line[marker_pos..];

    let content_start = tail.find('>').ok_or_else(|| {
        XrdProfileError::format(
            source_name,
            format!("line {}: unterminated <counts> tag", line_no),
        )
    })?;
    let content = &tail[content_start + 1..];

    let content_end = content.find("</").ok_or_else(|| {
        XrdProfileError::format(
            source_name,
            format!("line {}: missing closing </counts> tag", line_no),
        )
    })?;
    let content = &content[..content_end];

    let values = content
        .split_whitespace()
        .map(|token| {
            token.parse::<u32>().map_err(|_| {
                XrdProfileError::format(
                    source_name,
                    format!("line {}: invalid count value '{}'", line_no, token),
                )
            })
        })
        .collect::<Result<Vec<u32>>>()?;

    if values.is_empty() {
        return Err(XrdProfileError::format(
            source_name,
            format!("line {}: empty data row", line_no),
        ));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xrdMeasurements>
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
</xrdMeasurements>
"#;

    #[test]
    fn test_decode_counts_basic() {
        let grid = decode_counts(Cursor::new(SAMPLE), "sample").unwrap();
        assert_eq!(grid.n_rows(), 3);
        assert_eq!(grid.n_cols(), 3);
        let rows: Vec<&[u32]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0, 1, 0][..], &[2, 0, 2][..], &[0, 1, 0][..]]);
    }

    #[test]
    fn test_row_order_follows_file_order() {
        let content = "<counts>3 3</counts>\n<counts>1 1</counts>\n<counts>3 3</counts>\n";
        let grid = decode_counts(Cursor::new(content), "order").unwrap();
        let rows: Vec<&[u32]> = grid.rows().collect();
        assert_eq!(rows, vec![&[3, 3][..], &[1, 1][..], &[3, 3][..]]);
    }

    #[test]
    fn test_irregular_whitespace() {
        let content = "  <counts unit=\"counts\">  5\t6   7 </counts>\n";
        let grid = decode_counts(Cursor::new(content), "ws").unwrap();
        assert_eq!(grid.rows().next(), Some(&[5, 6, 7][..]));
    }

    #[test]
    fn test_no_rows_is_format_error() {
        let result = decode_counts(Cursor::new("<dataPoints>\n</dataPoints>\n"), "empty");
        assert!(matches!(result, Err(XrdProfileError::FormatError { .. })));
    }

    #[test]
    fn test_ragged_rows_is_format_error() {
        let content = "<counts>1 2 3</counts>\n<counts>1 2</counts>\n";
        let err = decode_counts(Cursor::new(content), "ragged").unwrap_err();
        match err {
            XrdProfileError::FormatError { reason, .. } => {
                assert!(reason.contains("rectangular"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_token_is_format_error() {
        let content = "<counts>1 2 3</counts>\n<counts>1 x 3</counts>\n";
        let err = decode_counts(Cursor::new(content), "bad").unwrap_err();
        match err {
            XrdProfileError::FormatError { reason, .. } => {
                assert!(reason.contains("line 2"));
                assert!(reason.contains("'x'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_count_rejected() {
        let content = "<counts>1 -2 3</counts>\n";
        assert!(decode_counts(Cursor::new(content), "neg").is_err());
    }

    #[test]
    fn test_missing_closing_tag() {
        let content = "<counts>1 2 3\n";
        assert!(matches!(
            decode_counts(Cursor::new(content), "open"),
            Err(XrdProfileError::FormatError { .. })
        ));
    }

    #[test]
    fn test_empty_row_rejected() {
        let content = "<counts unit=\"counts\"></counts>\n";
        assert!(decode_counts(Cursor::new(content), "blank").is_err());
    }

    #[test]
    fn test_decode_file_twice_is_identical() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let first = decode_counts_file(file.path()).unwrap();
        let second = decode_counts_file(file.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file() {
        let result = decode_counts_file(Path::new("/nonexistent/scan.xrdml"));
        assert!(matches!(result, Err(XrdProfileError::FileNotFound { .. })));
    }
}
