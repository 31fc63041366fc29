//! # inspect 子命令实现
//!
//! 解码扫描文件并显示网格尺寸与角度轴标定。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的 InspectArgs
//! - 使用 `parsers/` 读取扫描

use crate::cli::inspect::InspectArgs;
use crate::error::Result;
use crate::models::Scan;
use crate::parsers;
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Debug, Tabled)]
struct InfoRow {
    #[tabled(rename = "Property")]
    property: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header("Diffraction Scan Summary");

    let scan = parsers::load_scan(&args.file)?;
    output::print_success(&format!("Decoded '{}'", args.file.display()));

    let rows = summary_rows(&scan, args.legacy_label);
    println!("{}", Table::new(&rows));

    Ok(())
}

fn summary_rows(scan: &Scan, legacy_label: bool) -> Vec<InfoRow> {
    let grid = &scan.grid;
    let cal = &scan.calibration;
    let label = if legacy_label {
        cal.legacy_label()
    } else {
        cal.label()
    };

    vec![
        InfoRow {
            property: "Channels (rows)",
            value: grid.n_rows().to_string(),
        },
        InfoRow {
            property: "Steps (columns)",
            value: grid.n_cols().to_string(),
        },
        InfoRow {
            property: "Axis",
            value: cal.axis_name.clone(),
        },
        InfoRow {
            property: "Unit",
            value: cal.axis_unit.clone(),
        },
        InfoRow {
            property: "Label",
            value: label,
        },
        InfoRow {
            property: "Start",
            value: format!("{:.4}", cal.start_angle),
        },
        InfoRow {
            property: "End",
            value: format!("{:.4}", cal.end_angle),
        },
        InfoRow {
            property: "Step size",
            value: format!("{:.6}", cal.step(grid.n_cols())),
        },
        InfoRow {
            property: "Total counts",
            value: grid.total_counts().to_string(),
        },
        InfoRow {
            property: "Max counts",
            value: grid.max_count().to_string(),
        },
    ]
}
