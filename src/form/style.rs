//! Presentation hooks for validation and send state.

use super::{ATTR_INVALID_MSG, ATTR_SENT_MESSAGE, FieldKind, Form, FormField, Notice};

/// Visual feedback for a managed form. Swap the implementation to match a
/// site's CSS framework.
pub trait FormStyle {
    fn mark_invalid(&mut self, field: &mut FormField);
    fn unmark_invalid(&mut self, field: &mut FormField);
    fn mark_valid(&mut self, field: &mut FormField);
    fn unmark_valid(&mut self, field: &mut FormField);
    /// Clear every mark left by a previous attempt.
    fn reset_validation(&mut self, form: &mut Form);
    fn set_form_invalid(&mut self, _form: &mut Form) {}
    fn set_form_valid(&mut self, _form: &mut Form) {}
    fn set_form_sending(&mut self, form: &mut Form);
    fn set_form_sent_ok(&mut self, form: &mut Form);
    fn set_form_sent_error(&mut self, form: &mut Form);
}

const INVALID: &str = "is-invalid";
const VALID: &str = "is-valid";
const SENDING_LABEL: &str = "Sending...";
const SENT_DEFAULT: &str = "E-Mail sent successfully!";
const SEND_FAILED: &str = "[Error] Sending email failed! See browser console for details.";

/// Bootstrap 5 classes and alerts.
#[derive(Debug, Default)]
pub struct BootstrapStyle {
    label_before_sending: Option<String>,
}

impl FormStyle for BootstrapStyle {
    fn mark_invalid(&mut self, field: &mut FormField) {
        field.classes.insert(INVALID.to_string());
        if let Some(msg) = field.attributes.get(ATTR_INVALID_MSG) {
            field.feedback = Some(msg.clone());
        }
    }

    fn unmark_invalid(&mut self, field: &mut FormField) {
        field.classes.remove(INVALID);
    }

    fn mark_valid(&mut self, field: &mut FormField) {
        field.classes.insert(VALID.to_string());
    }

    fn unmark_valid(&mut self, field: &mut FormField) {
        field.classes.remove(VALID);
    }

    fn reset_validation(&mut self, form: &mut Form) {
        for field in &mut form.fields {
            if field.has_class(INVALID) {
                field.feedback = None;
            }
            self.unmark_invalid(field);
            self.unmark_valid(field);
        }
    }

    fn set_form_sending(&mut self, form: &mut Form) {
        if let Some(button) = &mut form.submit {
            let previous = std::mem::replace(&mut button.label, SENDING_LABEL.to_string());
            self.label_before_sending = Some(previous);
        }
    }

    fn set_form_sent_ok(&mut self, form: &mut Form) {
        for field in &mut form.fields {
            if matches!(field.kind, FieldKind::Select | FieldKind::Submit) {
                continue;
            }
            field.readonly = true;
        }
        let message = form
            .attribute(ATTR_SENT_MESSAGE)
            .unwrap_or(SENT_DEFAULT)
            .to_string();
        form.submit = None;
        form.notice = Some(Notice::Success(message));
        self.label_before_sending = None;
    }

    fn set_form_sent_error(&mut self, form: &mut Form) {
        if let (Some(button), Some(label)) = (&mut form.submit, self.label_before_sending.take()) {
            button.label = label;
        }
        form.notice = Some(Notice::Error(SEND_FAILED.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Form {
        Form::new()
            .with_field(
                FormField::new(FieldKind::Email, "mail")
                    .with_attribute(ATTR_INVALID_MSG, "Please enter an address"),
            )
            .with_field(FormField::new(FieldKind::Select, "topic"))
            .with_submit("Send")
    }

    #[test]
    fn invalid_mark_adds_feedback_and_reset_clears_it() {
        let mut style = BootstrapStyle::default();
        let mut form = form();
        style.mark_invalid(&mut form.fields[0]);
        style.mark_valid(&mut form.fields[1]);
        assert!(form.fields[0].has_class("is-invalid"));
        assert_eq!(
            form.fields[0].feedback.as_deref(),
            Some("Please enter an address")
        );

        style.reset_validation(&mut form);
        assert!(form.fields[0].classes.is_empty());
        assert!(form.fields[1].classes.is_empty());
        assert_eq!(form.fields[0].feedback, None);
    }

    #[test]
    fn sending_label_restored_on_error() {
        let mut style = BootstrapStyle::default();
        let mut form = form();
        style.set_form_sending(&mut form);
        assert_eq!(form.submit.as_ref().unwrap().label, "Sending...");

        style.set_form_sent_error(&mut form);
        assert_eq!(form.submit.as_ref().unwrap().label, "Send");
        assert_eq!(form.notice, Some(Notice::Error(SEND_FAILED.to_string())));
    }

    #[test]
    fn success_replaces_submit_and_locks_fields() {
        let mut style = BootstrapStyle::default();
        let mut form = form().with_attribute(ATTR_SENT_MESSAGE, "Thanks!");
        style.set_form_sending(&mut form);
        style.set_form_sent_ok(&mut form);
        assert_eq!(form.submit, None);
        assert_eq!(form.notice, Some(Notice::Success("Thanks!".into())));
        assert!(form.fields[0].readonly);
        assert!(!form.fields[1].readonly, "selects cannot be readonly");
    }

    #[test]
    fn success_message_default() {
        let mut style = BootstrapStyle::default();
        let mut form = form();
        style.set_form_sent_ok(&mut form);
        assert_eq!(form.notice, Some(Notice::Success(SENT_DEFAULT.into())));
    }
}
