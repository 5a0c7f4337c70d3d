use crate::effective::{EffectivePointSet, merge_effective_points};
use domain::{
    ChannelId, ChannelKind, ChannelRecord, DataJsonDocument, DeviceInstance, DeviceSummary,
    DeviceTypeTemplate, safe_number_conversion,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, warn};

/// 导出累加器：按通道类别的全局计数器与已占用通道集合。
///
/// 计数器跨设备递增，保证合成的通道标识在整份配置内唯一。
#[derive(Debug, Clone, Default)]
pub struct ExportContext {
    next_index: BTreeMap<ChannelKind, u32>,
    reserved: HashSet<ChannelId>,
}

impl ExportContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记已显式分配的通道；已被占用时返回 false。
    pub fn reserve(&mut self, channel: ChannelId) -> bool {
        self.reserved.insert(channel)
    }

    /// 分配该类别下一个未被占用的通道。
    pub fn allocate(&mut self, kind: ChannelKind) -> ChannelId {
        let next = self.next_index.entry(kind).or_insert(0);
        loop {
            let channel = ChannelId::new(kind, *next);
            *next += 1;
            if self.reserved.insert(channel) {
                return channel;
            }
        }
    }
}

/// 因找不到设备类型而未导出的设备。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDevice {
    pub device_id: String,
    pub device_name: String,
    pub device_type_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    /// user/network 不由导出生成，保持为 `None`，由调用方补齐。
    pub document: DataJsonDocument,
    pub skipped: Vec<SkippedDevice>,
}

/// 以全新的计数器导出全部实例。
pub fn export_flattened_document(
    templates: &[DeviceTypeTemplate],
    instances: &[DeviceInstance],
) -> ExportReport {
    export_with_context(templates, instances, &mut ExportContext::new())
}

pub fn export_with_context(
    templates: &[DeviceTypeTemplate],
    instances: &[DeviceInstance],
    ctx: &mut ExportContext,
) -> ExportReport {
    let by_id: HashMap<&str, &DeviceTypeTemplate> = templates
        .iter()
        .map(|template| (template.id.as_str(), template))
        .collect();

    let mut report = ExportReport::default();
    let mut resolved: Vec<(&DeviceInstance, &DeviceTypeTemplate, EffectivePointSet)> = Vec::new();
    for instance in instances {
        match by_id.get(instance.device_type_id.as_str()).copied() {
            Some(template) => {
                let effective = merge_effective_points(instance, template);
                resolved.push((instance, template, effective));
            }
            None => {
                warn!(
                    target: "hmc.merge",
                    device_id = %instance.id,
                    device_name = %instance.name,
                    device_type_id = %instance.device_type_id,
                    "device type not found, device skipped"
                );
                hmc_telemetry::record_device_skipped();
                report.skipped.push(SkippedDevice {
                    device_id: instance.id.clone(),
                    device_name: instance.name.clone(),
                    device_type_id: instance.device_type_id.clone(),
                });
            }
        }
    }

    // 先登记所有显式通道，合成通道只会落在空位上。
    for (instance, _, effective) in &resolved {
        for point in &effective.points {
            if let Some(channel) = point.usable_channel() {
                if !ctx.reserve(channel) {
                    warn!(
                        target: "hmc.merge",
                        device_name = %instance.name,
                        %channel,
                        "channel assigned more than once"
                    );
                }
            }
        }
    }

    for (instance, template, effective) in &resolved {
        let counts = effective.counts();
        report.document.devices.push(DeviceSummary {
            name: instance.name.clone(),
            device_type: template.summary_type().to_string(),
            di_num: counts.digital_in,
            do_num: counts.digital_out,
            ai_num: counts.flattened_analog_in(),
            conaddr: instance.conaddr.as_ref().map(safe_number_conversion),
            retadd: instance.retadd.as_ref().map(safe_number_conversion),
        });
        for point in &effective.points {
            let channel = point
                .usable_channel()
                .unwrap_or_else(|| ctx.allocate(point.kind().channel_kind()));
            report.document.push_channel(ChannelRecord {
                channel,
                dev: instance.name.clone(),
                value: point.exported_value().map(safe_number_conversion),
                bit: point.bit.as_ref().map(safe_number_conversion),
            });
        }
        hmc_telemetry::record_device_exported();
    }

    info!(
        target: "hmc.merge",
        devices = report.document.devices.len(),
        skipped = report.skipped.len(),
        "flattened document exported"
    );
    report
}
