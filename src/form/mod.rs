//! Form mail helper.
//!
//! Forms carrying `data-micx-formmail-preset` are submitted to the form
//! mail service instead of their `action`. The helper works on a plain
//! model of the form so the host binding stays thin:
//!
//! | Stage | Module | Entry point |
//! |-------|--------|-------------|
//! | **Collect** | [`collect`] | [`collect_form_data`]: values, arrays, validity |
//! | **Style** | [`style`] | [`FormStyle`] hooks, [`BootstrapStyle`] default |
//! | **Submit** | [`submit`] | [`FormSubmitter::begin`] / [`FormSubmitter::complete`] |
//!
//! The network call itself belongs to the host: `begin` hands out a
//! [`MailRequest`], the host POSTs it and reports the outcome to `complete`.

pub mod collect;
pub mod style;
pub mod submit;

use std::collections::{BTreeMap, BTreeSet};

pub use collect::{FieldValue, FormCollected, FormData, collect_form_data};
pub use style::{BootstrapStyle, FormStyle};
pub use submit::{
    FormSubmitter, MailEndpoint, MailError, MailRequest, Submission, blocks_enter_submit,
};

/// Marks a managed form and names the server-side mail preset.
pub const ATTR_PRESET: &str = "data-micx-formmail-preset";
/// Success message shown after sending.
pub const ATTR_SENT_MESSAGE: &str = "data-micx-formmail-sent-message";
/// Per-field message shown when the field is invalid.
pub const ATTR_INVALID_MSG: &str = "data-invalid-msg";

/// Control type, as given by an input's `type` or the element tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Date,
    Checkbox,
    Submit,
    Select,
    TextArea,
    Other(String),
}

impl FieldKind {
    /// Kind for an `<input type=...>`, case-insensitive.
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type.to_ascii_lowercase().as_str() {
            "" | "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "date" => FieldKind::Date,
            "checkbox" => FieldKind::Checkbox,
            "submit" => FieldKind::Submit,
            other => FieldKind::Other(other.to_string()),
        }
    }
}

/// One `input`, `select` or `textarea`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub kind: FieldKind,
    pub name: String,
    pub id: String,
    pub value: String,
    pub checked: bool,
    /// Constraint validation result reported by the browser.
    pub valid: bool,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    /// Invalid-feedback node rendered after the field.
    pub feedback: Option<String>,
    pub readonly: bool,
}

impl FormField {
    pub fn new(kind: FieldKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            id: String::new(),
            value: String::new(),
            checked: false,
            valid: true,
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            feedback: None,
            readonly: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Mark as failing browser constraint validation.
    pub fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: String,
    pub disabled: bool,
}

/// Message shown in place of, or next to, the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    pub attributes: BTreeMap<String, String>,
    pub fields: Vec<FormField>,
    pub submit: Option<SubmitButton>,
    pub notice: Option<Notice>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_submit(mut self, label: impl Into<String>) -> Self {
        self.submit = Some(SubmitButton {
            label: label.into(),
            disabled: false,
        });
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the mail helper handles this form.
    pub fn is_managed(&self) -> bool {
        self.attributes.contains_key(ATTR_PRESET)
    }

    /// Mail preset, `default` only when the attribute is missing. An empty
    /// value is sent as-is.
    pub fn preset(&self) -> &str {
        self.attribute(ATTR_PRESET).unwrap_or("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_from_input_type() {
        assert_eq!(FieldKind::from_input_type("EMAIL"), FieldKind::Email);
        assert_eq!(FieldKind::from_input_type(""), FieldKind::Text);
        assert_eq!(
            FieldKind::from_input_type("tel"),
            FieldKind::Other("tel".into())
        );
    }

    #[test]
    fn preset_defaults() {
        assert!(!Form::new().is_managed());
        assert_eq!(Form::new().preset(), "default");
        let form = Form::new().with_attribute(ATTR_PRESET, "");
        assert!(form.is_managed());
        assert_eq!(form.preset(), "");
        let form = Form::new().with_attribute(ATTR_PRESET, "contact");
        assert_eq!(form.preset(), "contact");
    }
}
