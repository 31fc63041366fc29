//! # 渲染与导出模块
//!
//! 把扫描和剖面结果交给外部呈现：热图 + 叠加曲线图像，或数据文件。
//!
//! ## 子模块
//! - `colormap`: jet 色图
//! - `plot`: 图表生成 (PNG/SVG)
//! - `export`: 数据导出 (CSV/XY)
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs` 调用
//! - 使用 `models/` 与 `profile/` 的计算结果

pub mod colormap;
pub mod export;
pub mod plot;

pub use plot::{Figure, FigureOptions};
