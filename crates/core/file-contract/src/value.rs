use domain::{FieldValue, parse_number};
use serde_json::{Number, Value};

/// JSON 值 → 字段值；`null` 视为缺省，布尔值按字符串保留。
pub fn field_value_from_json(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        Value::Number(number) => number.as_f64().map(FieldValue::Number),
        Value::String(text) => Some(FieldValue::Text(text.clone())),
        Value::Bool(flag) => Some(FieldValue::Text(flag.to_string())),
        other => Some(FieldValue::Text(other.to_string())),
    }
}

/// 字段值 → JSON；整数输出为整数而不是 `3.0`。
pub fn field_value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Number(number) => number_to_json(*number),
        FieldValue::Text(text) => Value::String(text.clone()),
    }
}

pub(crate) fn number_to_json(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < 9.0e15 {
        return Value::Number(Number::from(number as i64));
    }
    Number::from_f64(number)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// 点位 `value`：数字或数字字符串，其余按 0 处理。
pub(crate) fn number_from_json(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or_default(),
        Some(Value::String(text)) => parse_number(text).unwrap_or_default(),
        _ => 0.0,
    }
}
