//! # 剖面分析模块
//!
//! 从二维强度网格中提取角度窗口内的一维剖面，并计算参考衍射峰位置。
//!
//! ## 子模块
//! - `window`: 角度窗口到列索引的映射
//! - `extractor`: 列/行剖面、质心与归一化
//! - `reflections`: 简单立方参考峰位
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs` 使用
//! - 使用 `models/` 数据模型

pub mod extractor;
pub mod reflections;
pub mod window;

pub use extractor::{extract_column_profile, extract_row_profile};
pub use reflections::Reflection;
pub use window::WindowPolicy;
