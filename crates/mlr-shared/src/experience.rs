//! Experiences as supplied by the host content source.
//!
//! Field values are kept as raw JSON: only strings are validated, and the
//! host is free to put numbers or objects in fields we do not care about.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name -> field record.
pub type ExperienceFields = BTreeMap<String, ExperienceField>;

/// One named piece of authored content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default)]
    pub field_value: Value,
}

impl ExperienceField {
    pub fn text(value: &str) -> Self {
        Self {
            field_name: None,
            field_value: Value::String(value.to_string()),
        }
    }

    pub fn raw(value: Value) -> Self {
        Self {
            field_name: None,
            field_value: value,
        }
    }

    /// The value when it is a string.
    pub fn as_text(&self) -> Option<&str> {
        self.field_value.as_str()
    }
}

/// One authored content variant (e.g. one email).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    #[serde(default)]
    pub experience_fields: ExperienceFields,
}

impl Experience {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            experience_fields: ExperienceFields::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.experience_fields
            .insert(name.to_string(), ExperienceField::text(value));
        self
    }
}

/// Best-effort decode of a loosely shaped field mapping.
///
/// Entries that are not objects are dropped; an entry without `fieldValue`
/// decodes with a null value. Anything other than a JSON object yields `None`.
pub fn fields_from_value(value: &Value) -> Option<ExperienceFields> {
    let map = value.as_object()?;
    let fields = map
        .iter()
        .filter_map(|(name, entry)| {
            let obj = entry.as_object()?;
            Some((
                name.clone(),
                ExperienceField {
                    field_name: obj
                        .get("fieldName")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    field_value: obj.get("fieldValue").cloned().unwrap_or(Value::Null),
                },
            ))
        })
        .collect();
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_host_shape() {
        let exp: Experience = serde_json::from_value(json!({
            "id": "exp-1",
            "experienceFields": {
                "header": { "fieldName": "header", "fieldValue": "Hello" },
                "count": { "fieldValue": 42 }
            }
        }))
        .unwrap();
        assert_eq!(exp.experience_fields["header"].as_text(), Some("Hello"));
        assert_eq!(exp.experience_fields["count"].as_text(), None);
    }

    #[test]
    fn test_fields_from_value_tolerates_junk() {
        let fields = fields_from_value(&json!({
            "header": { "fieldValue": "Hi" },
            "broken": "not an object",
            "empty": {}
        }))
        .unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["empty"].field_value, Value::Null);
        assert!(fields_from_value(&json!([1, 2, 3])).is_none());
        assert!(fields_from_value(&Value::Null).is_none());
    }
}
