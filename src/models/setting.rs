//! Backend settings whose `value` shape is decided by an explicit `type` tag.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SettingCategory {
    #[default]
    General,
    Notifications,
    Billing,
    Appearance,
    System,
}

impl SettingCategory {
    pub const ALL: [SettingCategory; 5] = [
        SettingCategory::General,
        SettingCategory::Notifications,
        SettingCategory::Billing,
        SettingCategory::Appearance,
        SettingCategory::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingCategory::General => "general",
            SettingCategory::Notifications => "notifications",
            SettingCategory::Billing => "billing",
            SettingCategory::Appearance => "appearance",
            SettingCategory::System => "system",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl SettingValue {
    pub fn kind(&self) -> SettingType {
        match self {
            SettingValue::String(_) => SettingType::String,
            SettingValue::Number(_) => SettingType::Number,
            SettingValue::Boolean(_) => SettingType::Boolean,
            SettingValue::Object(_) => SettingType::Object,
            SettingValue::Array(_) => SettingType::Array,
        }
    }

    /// Checks a raw JSON value against its declared type.
    pub fn from_json(kind: SettingType, value: Value) -> Result<Self, ClientError> {
        match (kind, value) {
            (SettingType::String, Value::String(s)) => Ok(SettingValue::String(s)),
            (SettingType::String, Value::Null) => Ok(SettingValue::String(String::new())),
            (SettingType::Number, Value::Number(n)) => n
                .as_f64()
                .map(SettingValue::Number)
                .ok_or_else(|| ClientError::InvalidSetting(format!("{n} is not a finite number"))),
            (SettingType::Boolean, Value::Bool(b)) => Ok(SettingValue::Boolean(b)),
            (SettingType::Object, Value::Object(map)) => Ok(SettingValue::Object(map)),
            (SettingType::Array, Value::Array(items)) => Ok(SettingValue::Array(items)),
            (kind, other) => Err(ClientError::InvalidSetting(format!(
                "expected {kind:?} value, got {other}"
            ))),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SettingValue::String(s) => Value::String(s.clone()),
            SettingValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            SettingValue::Boolean(b) => Value::Bool(*b),
            SettingValue::Object(map) => Value::Object(map.clone()),
            SettingValue::Array(items) => Value::Array(items.clone()),
        }
    }

    /// Parses what a user typed into the editor for a setting of type `kind`.
    pub fn parse_input(kind: SettingType, raw: &str) -> Result<Self, ClientError> {
        let trimmed = raw.trim();
        match kind {
            SettingType::String => Ok(SettingValue::String(raw.to_string())),
            SettingType::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(SettingValue::Number)
                .ok_or_else(|| ClientError::InvalidSetting(format!("'{trimmed}' is not a number"))),
            SettingType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(SettingValue::Boolean(true)),
                "false" | "no" | "off" | "0" => Ok(SettingValue::Boolean(false)),
                _ => Err(ClientError::InvalidSetting(format!(
                    "'{trimmed}' is not true or false"
                ))),
            },
            SettingType::Object | SettingType::Array => {
                let value: Value = serde_json::from_str(trimmed)
                    .map_err(|err| ClientError::InvalidSetting(format!("invalid JSON: {err}")))?;
                Self::from_json(kind, value)
            }
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(s) => f.write_str(s),
            SettingValue::Number(n) => write!(f, "{n}"),
            SettingValue::Boolean(true) => f.write_str("Enabled"),
            SettingValue::Boolean(false) => f.write_str("Disabled"),
            SettingValue::Object(_) | SettingValue::Array(_) => {
                let pretty = serde_json::to_string_pretty(&self.to_json()).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSetting", into = "RawSetting")]
pub struct Setting {
    pub id: Option<String>,
    pub key: String,
    pub value: SettingValue,
    pub label: String,
    pub description: Option<String>,
    pub category: SettingCategory,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSetting {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    key: String,
    #[serde(default)]
    value: Value,
    #[serde(rename = "type")]
    kind: SettingType,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    category: SettingCategory,
    #[serde(default)]
    is_public: bool,
}

impl TryFrom<RawSetting> for Setting {
    type Error = ClientError;

    fn try_from(raw: RawSetting) -> Result<Self, Self::Error> {
        let value = SettingValue::from_json(raw.kind, raw.value)
            .map_err(|err| ClientError::InvalidSetting(format!("{}: {}", raw.key, err.user_message())))?;
        let label = if raw.label.is_empty() {
            raw.key.clone()
        } else {
            raw.label
        };
        Ok(Setting {
            id: raw.id,
            key: raw.key,
            value,
            label,
            description: raw.description,
            category: raw.category,
            is_public: raw.is_public,
        })
    }
}

impl From<Setting> for RawSetting {
    fn from(setting: Setting) -> Self {
        RawSetting {
            id: setting.id,
            key: setting.key,
            kind: setting.value.kind(),
            value: setting.value.to_json(),
            label: setting.label,
            description: setting.description,
            category: setting.category,
            is_public: setting.is_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_by_type_tag() {
        let setting: Setting = serde_json::from_value(json!({
            "_id": "x",
            "key": "darkMode",
            "value": true,
            "type": "boolean",
            "label": "Dark mode",
            "category": "appearance",
            "isPublic": true
        }))
        .unwrap();
        assert_eq!(setting.value, SettingValue::Boolean(true));
        assert_eq!(setting.category, SettingCategory::Appearance);

        let back = serde_json::to_value(&setting).unwrap();
        assert_eq!(back["type"], "boolean");
        assert_eq!(back["value"], true);
    }

    #[test]
    fn test_mismatched_tag_rejected() {
        let result: Result<Setting, _> = serde_json::from_value(json!({
            "key": "maxMembers",
            "value": "lots",
            "type": "number"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_label_defaults_to_key() {
        let setting: Setting = serde_json::from_value(json!({
            "key": "gymName", "value": "Iron Temple", "type": "string"
        }))
        .unwrap();
        assert_eq!(setting.label, "gymName");
        assert_eq!(setting.category, SettingCategory::General);
    }

    #[test]
    fn test_parse_input_dispatches_on_type() {
        assert_eq!(
            SettingValue::parse_input(SettingType::Number, " 42.5 ").unwrap(),
            SettingValue::Number(42.5)
        );
        assert_eq!(
            SettingValue::parse_input(SettingType::Boolean, "Off").unwrap(),
            SettingValue::Boolean(false)
        );
        assert!(SettingValue::parse_input(SettingType::Number, "abc").is_err());
        assert!(SettingValue::parse_input(SettingType::Array, r#"{"a":1}"#).is_err());
        assert_eq!(
            SettingValue::parse_input(SettingType::Array, r#"["mon","tue"]"#).unwrap(),
            SettingValue::Array(vec![json!("mon"), json!("tue")])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(SettingValue::Boolean(true).to_string(), "Enabled");
        assert_eq!(SettingValue::Number(3.0).to_string(), "3");
    }
}
