use domain::{
    ChannelOverride, DeviceInstance, DeviceTypeTemplate, Point, PointCounts, PointKey,
    PointSource, normalize_channel,
};
use std::collections::HashMap;

/// 某个实例合并后的最终点位列表（派生数据，不持久化）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectivePointSet {
    pub points: Vec<Point>,
}

impl EffectivePointSet {
    pub fn counts(&self) -> PointCounts {
        PointCounts::from_points(&self.points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 计算实例的有效点位。
///
/// 独立副本形态直接使用实例点位，不读取模板；覆盖表形态为
/// 模板点位 + 自定义点位，再叠加通道覆盖。
pub fn merge_effective_points(
    instance: &DeviceInstance,
    template: &DeviceTypeTemplate,
) -> EffectivePointSet {
    match &instance.source {
        PointSource::Independent { points } => EffectivePointSet {
            points: points.clone(),
        },
        PointSource::Overlay {
            custom_points,
            channel_overrides,
            persisted_points,
        } => {
            let overrides = override_map(channel_overrides, persisted_points);
            let points = template
                .points
                .iter()
                .chain(custom_points.iter())
                .cloned()
                .map(|mut point| {
                    if let Some(channel) = overrides.get(&point.key()) {
                        point.channel = Some(channel.clone());
                    }
                    point
                })
                .collect();
            EffectivePointSet { points }
        }
    }
}

/// 覆盖来源：覆盖表非空时以其为准，否则回退到历史保存的 points；两者从不混用。
/// 占位通道不参与覆盖。
fn override_map(
    channel_overrides: &[ChannelOverride],
    persisted_points: &[Point],
) -> HashMap<PointKey, String> {
    let mut map = HashMap::new();
    if !channel_overrides.is_empty() {
        for item in channel_overrides {
            if let Some(channel) = normalize_channel(&item.channel) {
                map.insert(item.key.clone(), channel);
            }
        }
        return map;
    }
    for point in persisted_points {
        if let Some(channel) = point.channel.as_deref().and_then(normalize_channel) {
            map.entry(point.key()).or_insert(channel);
        }
    }
    map
}
