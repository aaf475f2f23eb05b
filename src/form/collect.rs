//! Gather submittable values from a form.
//!
//! Rules, in field order:
//!
//! - a field failing browser validation is recorded as invalid
//! - e-mail values are trimmed in place and must look like an address
//! - fields with neither name nor id are skipped
//! - unchecked checkboxes contribute nothing
//! - `date` values are localized to `D.M.YYYY`
//! - `name[]` accumulates into an array, any other repeated name overwrites

use super::{FieldKind, Form, FormField};
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\d._%+-]+@[\p{L}\d.-]+\.\p{L}{2,}$").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl From<&FieldValue> for serde_json::Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Single(s) => serde_json::Value::from(s.as_str()),
            FieldValue::Multiple(items) => serde_json::Value::from(items.clone()),
        }
    }
}

pub type FormData = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct FormCollected {
    pub data: FormData,
    /// Indices into `Form::fields`.
    pub invalid: Vec<usize>,
}

pub fn collect_form_data(form: &mut Form) -> FormCollected {
    let mut data = FormData::new();
    let mut invalid = Vec::new();

    for (index, field) in form.fields.iter_mut().enumerate() {
        let mut valid = field.valid;
        if field.kind == FieldKind::Email {
            field.value = field.value.trim().to_string();
            if !field.value.is_empty() && !EMAIL.is_match(&field.value) {
                valid = false;
            }
        }
        if !valid {
            invalid.push(index);
        }

        let Some(name) = field_name(field) else {
            if field.kind != FieldKind::Submit {
                warn!(index, "skipping form field without id or name");
            }
            continue;
        };

        if field.kind == FieldKind::Checkbox && !field.checked {
            continue;
        }

        let value = match field.kind {
            FieldKind::Date => localize_date(&field.value),
            _ => field.value.clone(),
        };

        match name.strip_suffix("[]") {
            Some(key) => match data.get_mut(key) {
                Some(FieldValue::Multiple(items)) => items.push(value),
                _ => {
                    data.insert(key.to_string(), FieldValue::Multiple(vec![value]));
                }
            },
            None => {
                data.insert(name, FieldValue::Single(value));
            }
        }
    }

    FormCollected { data, invalid }
}

fn field_name(field: &FormField) -> Option<String> {
    let name = if field.name.is_empty() {
        &field.id
    } else {
        &field.name
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// `2024-03-07` → `7.3.2024`. Anything unparseable passes through.
fn localize_date(value: &str) -> String {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.format("%-d.%-m.%Y").to_string(),
        Err(_) => value.to_string(),
    }
}
