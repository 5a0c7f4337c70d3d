use crate::error::ContractError;
use crate::value::{field_value_from_json, field_value_to_json, number_from_json, number_to_json};
use domain::{CHANNEL_PLACEHOLDER, Point, PointKind, PointSignal, normalize_channel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 文件中的点位记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDto {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub status_feedback: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit: Option<Value>,
}

impl TryFrom<PointDto> for Point {
    type Error = ContractError;

    fn try_from(dto: PointDto) -> Result<Self, Self::Error> {
        let kind = dto.kind.parse::<PointKind>()?;
        let status = dto.status.as_ref().and_then(field_value_from_json);
        let action = dto.action.as_ref().and_then(field_value_from_json);
        Ok(Point {
            id: dto.id,
            code: dto.code,
            status_code: dto.status_code,
            status_feedback: dto.status_feedback,
            value: number_from_json(dto.value.as_ref()),
            channel: dto.channel.as_deref().and_then(normalize_channel),
            bit: dto.bit.as_ref().and_then(field_value_from_json),
            signal: PointSignal::for_kind(kind, status, action),
        })
    }
}

impl From<&Point> for PointDto {
    fn from(point: &Point) -> Self {
        Self {
            id: point.id.clone(),
            kind: point.kind().as_str().to_string(),
            code: point.code.clone(),
            status_code: point.status_code.clone(),
            status_feedback: point.status_feedback.clone(),
            value: Some(number_to_json(point.value)),
            status: point.status().map(field_value_to_json),
            action: point.action().map(field_value_to_json),
            channel: Some(
                point
                    .channel
                    .clone()
                    .unwrap_or_else(|| CHANNEL_PLACEHOLDER.to_string()),
            ),
            bit: point.bit.as_ref().map(field_value_to_json),
        }
    }
}

pub(crate) fn points_from_dtos(dtos: Vec<PointDto>) -> Result<Vec<Point>, ContractError> {
    dtos.into_iter().map(Point::try_from).collect()
}

pub(crate) fn points_to_dtos(points: &[Point]) -> Vec<PointDto> {
    points.iter().map(PointDto::from).collect()
}
