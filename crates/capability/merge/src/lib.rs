//! # 设备配置合并
//!
//! 把设备类型模板与实例的点位数据合并为有效点位集，并导出扁平化文档：
//!
//! - [`merge_effective_points`]：按实例的点位形态（覆盖表 / 独立副本）得到有效点位；
//! - [`import_template_defaults`]：手动从模板补入缺失点位（按身份键求并集，不覆盖已有点位）；
//! - [`export_flattened_document`]：生成 `DataJsonDocument`，未分配通道的点位由
//!   [`ExportContext`] 按类别全局递增分配通道号。
//!
//! 找不到模板的实例只会被跳过（见 [`ExportReport::skipped`]），不影响其他设备。

mod effective;
mod export;
mod import;

pub use effective::{EffectivePointSet, merge_effective_points};
pub use export::{
    ExportContext, ExportReport, SkippedDevice, export_flattened_document, export_with_context,
};
pub use import::{fork_template_points, import_template_defaults};
