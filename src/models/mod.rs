//! # 数据模型模块
//!
//! 定义二维衍射扫描与一维剖面的统一数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`profile/`、`render/` 和 `commands/` 使用
//! - 子模块: scan, profile

pub mod profile;
pub mod scan;

pub use profile::{ColumnProfile, Profile, ProfileWindow, RowProfile, Segment};
pub use scan::{AxisCalibration, IntensityGrid, Scan};
