//! Generic create/edit form for any [`Resource`](crate::domain::resource::Resource).
//!
//! Submitted bodies may repeat keys (multi-selects), so the form keeps every
//! value per field and converts them into the JSON payload the remote API
//! expects according to each field's [`InputKind`].

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::{Map, Number, Value};

use crate::api::errors::FieldErrors;
use crate::domain::resource::{FormField, InputKind};
use crate::domain::types::{EntityId, parse_date};
use crate::forms::FormError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw values of a create/edit form, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceForm(BTreeMap<String, Vec<String>>);

impl ResourceForm {
    /// Parses an `application/x-www-form-urlencoded` body.
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let pairs: Vec<(String, String)> =
            serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))?;
        Ok(Self::from_pairs(pairs))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in pairs {
            let key = key.into();
            let key = key.strip_suffix("[]").map(str::to_string).unwrap_or(key);
            values.entry(key).or_default().push(value.into());
        }
        Self(values)
    }

    /// Pre-fills the form from an entity serialized to JSON.
    ///
    /// A `foo_id` field falls back to the `id` of an embedded `foo` object.
    pub fn from_entity(entity: &Value, fields: &[FormField]) -> Self {
        let mut values = BTreeMap::new();
        for field in fields {
            let raw = entity.get(field.name).filter(|v| !v.is_null()).or_else(|| {
                field
                    .name
                    .strip_suffix("_id")
                    .and_then(|stem| entity.get(stem))
                    .and_then(|related| related.get("id"))
            });
            let Some(raw) = raw else { continue };

            let mut collected = scalar_values(raw);
            if matches!(field.kind, InputKind::Date) {
                for value in &mut collected {
                    *value = date_part(value);
                }
            }
            if !collected.is_empty() {
                values.insert(field.name.to_string(), collected);
            }
        }
        Self(values)
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// First value of `name`, trimmed; `None` when missing or blank.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values(name)
            .first()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.value(name)
            .is_some_and(|value| matches!(value, "1" | "on" | "true"))
    }

    /// Converts the submitted values into the remote API payload.
    ///
    /// Optional blank fields become `null`. Every invalid field is reported,
    /// not only the first one.
    pub fn to_payload(&self, fields: &[FormField]) -> Result<Map<String, Value>, FieldErrors> {
        let mut payload = Map::new();
        let mut errors = FieldErrors::new();

        for field in fields {
            match self.field_value(field) {
                Ok(value) => {
                    payload.insert(field.name.to_string(), value);
                }
                Err(message) => errors.insert(field.name, message),
            }
        }

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }

    fn field_value(&self, field: &FormField) -> Result<Value, String> {
        let label = field.label.to_lowercase();
        match field.kind {
            InputKind::Checkbox => Ok(Value::Bool(self.is_checked(field.name))),
            InputKind::RemoteMultiSelect { .. } => self.id_list(field, &label),
            _ => self.single_value(field, &label),
        }
    }

    fn id_list(&self, field: &FormField, label: &str) -> Result<Value, String> {
        let mut ids = Vec::new();
        for raw in self.values(field.name) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let id =
                EntityId::from_str(raw).map_err(|_| format!("The {label} selection is invalid."))?;
            ids.push(Value::from(id.get()));
        }
        if field.required && ids.is_empty() {
            return Err(format!("The {label} field is required."));
        }
        Ok(Value::Array(ids))
    }

    fn single_value(&self, field: &FormField, label: &str) -> Result<Value, String> {
        let Some(raw) = self.value(field.name) else {
            return if field.required {
                Err(format!("The {label} field is required."))
            } else {
                Ok(Value::Null)
            };
        };

        match field.kind {
            InputKind::Number => parse_number(raw)
                .map(Value::Number)
                .ok_or_else(|| format!("The {label} field must be a number.")),
            InputKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(|date| Value::String(date.format(DATE_FORMAT).to_string()))
                .map_err(|_| format!("The {label} field must be a valid date.")),
            InputKind::RemoteSelect { .. } => EntityId::from_str(raw)
                .map(|id| Value::from(id.get()))
                .map_err(|_| format!("The {label} selection is invalid.")),
            InputKind::Select { options } => {
                if options.iter().any(|option| option.value == raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(format!("The selected {label} is invalid."))
                }
            }
            _ => Ok(Value::String(raw.to_string())),
        }
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Number::from(int));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Date inputs want `YYYY-MM-DD`; timestamps are cut to their date and
/// anything unreadable keeps at most its first ten characters.
fn date_part(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => match raw.char_indices().nth(10) {
            Some((end, _)) => raw[..end].to_string(),
            None => raw.to_string(),
        },
    }
}

fn scalar_values(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Bool(true) => vec!["1".to_string()],
        Value::Bool(false) => Vec::new(),
        Value::Number(number) => vec![number.to_string()],
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().flat_map(scalar_values).collect(),
        Value::Object(object) => object.get("id").map(scalar_values).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::resource::STATUS_OPTIONS;

    const FIELDS: &[FormField] = &[
        FormField::required("name", "Name", InputKind::Text),
        FormField::required(
            "division_id",
            "Division",
            InputKind::RemoteSelect {
                endpoint: "/divisions",
            },
        ),
        FormField::optional("capacity", "Capacity", InputKind::Number),
        FormField::optional("start_date", "Start date", InputKind::Date),
        FormField::optional("featured", "Featured", InputKind::Checkbox),
        FormField::optional(
            "course_ids",
            "Courses",
            InputKind::RemoteMultiSelect {
                endpoint: "/courses",
            },
        ),
        FormField::required(
            "status",
            "Status",
            InputKind::Select {
                options: STATUS_OPTIONS,
            },
        ),
    ];

    #[test]
    fn converts_submitted_values_by_kind() {
        let form = ResourceForm::parse(
            b"name=+Dhaka+&division_id=3&capacity=25&start_date=2024-02-01&featured=on\
              &course_ids=4&course_ids=9&status=active",
        )
        .unwrap();

        let payload = form.to_payload(FIELDS).unwrap();

        assert_eq!(
            Value::Object(payload),
            json!({
                "name": "Dhaka",
                "division_id": 3,
                "capacity": 25,
                "start_date": "2024-02-01",
                "featured": true,
                "course_ids": [4, 9],
                "status": "active",
            })
        );
    }

    #[test]
    fn blank_optional_fields_become_null() {
        let form = ResourceForm::from_pairs([
            ("name", "Dhaka"),
            ("division_id", "3"),
            ("capacity", ""),
            ("status", "inactive"),
        ]);

        let payload = form.to_payload(FIELDS).unwrap();

        assert_eq!(payload["capacity"], Value::Null);
        assert_eq!(payload["start_date"], Value::Null);
        assert_eq!(payload["featured"], Value::Bool(false));
        assert_eq!(payload["course_ids"], json!([]));
    }

    #[test]
    fn reports_every_invalid_field() {
        let form = ResourceForm::from_pairs([
            ("name", "  "),
            ("division_id", "abc"),
            ("capacity", "many"),
            ("start_date", "01/02/2024"),
            ("status", "archived"),
        ]);

        let errors = form.to_payload(FIELDS).unwrap_err();

        assert_eq!(errors.get("name"), Some("The name field is required."));
        assert_eq!(
            errors.get("division_id"),
            Some("The division selection is invalid.")
        );
        assert_eq!(
            errors.get("capacity"),
            Some("The capacity field must be a number.")
        );
        assert_eq!(
            errors.get("start_date"),
            Some("The start date field must be a valid date.")
        );
        assert_eq!(errors.get("status"), Some("The selected status is invalid."));
    }

    #[test]
    fn prefills_from_entity_including_embedded_relations() {
        let entity = json!({
            "id": 7,
            "name": "Mirpur",
            "division": {"id": 3, "name": "Dhaka"},
            "capacity": null,
            "start_date": "2024-02-01T00:00:00Z",
            "featured": true,
            "course_ids": [4, 9],
            "status": "active",
        });

        let form = ResourceForm::from_entity(&entity, FIELDS);

        assert_eq!(form.value("name"), Some("Mirpur"));
        assert_eq!(form.value("division_id"), Some("3"));
        assert_eq!(form.value("capacity"), None);
        assert_eq!(form.value("start_date"), Some("2024-02-01"));
        assert!(form.is_checked("featured"));
        assert_eq!(form.values("course_ids"), ["4", "9"]);
    }

    #[test]
    fn bracketed_keys_are_merged() {
        let form = ResourceForm::parse(b"course_ids%5B%5D=1&course_ids%5B%5D=2").unwrap();
        assert_eq!(form.values("course_ids"), ["1", "2"]);
    }

    #[test]
    fn prefilled_dates_accept_offsets_and_non_ascii_text() {
        let entity = json!({"name": "Uttara", "start_date": "2024-02-01T23:30:00+06:00"});
        let form = ResourceForm::from_entity(&entity, FIELDS);
        assert_eq!(form.value("start_date"), Some("2024-02-01"));

        let entity = json!({"name": "Uttara", "start_date": "২০২৪-০২-০১T00:00:00"});
        let form = ResourceForm::from_entity(&entity, FIELDS);
        assert_eq!(form.value("start_date"), Some("২০২৪-০২-০১"));
    }
}
