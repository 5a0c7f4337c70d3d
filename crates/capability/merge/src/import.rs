use domain::{DeviceTypeTemplate, Point, PointKey};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// 手动重新导入模板：只返回身份键尚不存在的模板点位（新 id），已有点位一律不动。
///
/// 以同一模板连续调用两次，第二次返回空列表。
pub fn import_template_defaults(current: &[Point], template: &DeviceTypeTemplate) -> Vec<Point> {
    let mut seen: HashSet<PointKey> = current.iter().map(Point::key).collect();
    let mut added = Vec::new();
    for point in &template.points {
        if !seen.insert(point.key()) {
            continue;
        }
        let mut point = point.clone();
        point.id = Uuid::new_v4().to_string();
        added.push(point);
    }
    debug!(
        target: "hmc.merge",
        template_id = %template.id,
        existing = current.len(),
        added = added.len(),
        "template defaults imported"
    );
    added
}

/// 创建实例时从模板复制出一份独立点位。
pub fn fork_template_points(template: &DeviceTypeTemplate) -> Vec<Point> {
    import_template_defaults(&[], template)
}
