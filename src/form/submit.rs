//! Submission flow for managed forms.
//!
//! ```text
//! begin ──► Invalid(fields)            (fields marked, nothing sent)
//!   └─────► Send(MailRequest) ──host POST──► complete(result)
//! ```
//!
//! Failures are reported once through the style's error hook. There is no
//! automatic retry; the visitor can press the button again.

use super::{Form, FormStyle, collect_form_data, style::BootstrapStyle};
use crate::config::FormmailConfig;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("form mail server responded {status}: {body}")]
    Server { status: u16, body: String },
    #[error("form mail request failed: {0}")]
    Transport(String),
}

/// Where and as whom mail is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEndpoint {
    pub root: String,
    pub subscription_id: String,
}

impl MailEndpoint {
    pub fn new(root: impl Into<String>, subscription_id: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            subscription_id: subscription_id.into(),
        }
    }

    pub fn from_config(config: &FormmailConfig) -> Self {
        Self::new(&config.endpoint_root, &config.subscription_id)
    }

    /// Send URL for `preset`.
    pub fn send_url(&self, preset: &str) -> String {
        format!(
            "{}/v1/formmailer/send?&subscription_id={}&preset={}",
            self.root.trim_end_matches('/'),
            self.subscription_id,
            preset
        )
    }
}

/// A POST the host should perform with `content-type: application/json`.
#[derive(Debug, Clone, PartialEq)]
pub struct MailRequest {
    pub url: String,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Indices of the fields that failed validation.
    Invalid(Vec<usize>),
    Send(MailRequest),
}

pub struct FormSubmitter {
    endpoint: MailEndpoint,
    style: Box<dyn FormStyle>,
}

impl FormSubmitter {
    /// Submitter with [`BootstrapStyle`].
    pub fn new(endpoint: MailEndpoint) -> Self {
        Self::with_style(endpoint, Box::new(BootstrapStyle::default()))
    }

    pub fn with_style(endpoint: MailEndpoint, style: Box<dyn FormStyle>) -> Self {
        Self { endpoint, style }
    }

    pub fn endpoint(&self) -> &MailEndpoint {
        &self.endpoint
    }

    /// Validate and collect. On success the submit button is disabled and
    /// the request to send is returned.
    pub fn begin(&mut self, form: &mut Form, page_url: &str) -> Submission {
        let collected = collect_form_data(form);
        self.style.reset_validation(form);

        if !collected.invalid.is_empty() {
            for &index in &collected.invalid {
                if let Some(field) = form.fields.get_mut(index) {
                    self.style.mark_invalid(field);
                }
            }
            self.style.set_form_invalid(form);
            debug!(invalid = collected.invalid.len(), "form rejected");
            return Submission::Invalid(collected.invalid);
        }
        self.style.set_form_valid(form);

        if let Some(button) = &mut form.submit {
            button.disabled = true;
        }
        self.style.set_form_sending(form);

        let mut body: serde_json::Map<String, serde_json::Value> = collected
            .data
            .iter()
            .map(|(name, value)| (name.clone(), value.into()))
            .collect();
        body.insert("__sending_hostname".into(), page_url.into());
        body.insert("__micxlib_rev".into(), env!("CARGO_PKG_VERSION").into());

        let url = self.endpoint.send_url(form.preset());
        debug!(%url, fields = collected.data.len(), "form ready to send");
        Submission::Send(MailRequest {
            url,
            body: serde_json::Value::Object(body),
        })
    }

    /// Report the outcome of the POST returned by [`begin`](Self::begin).
    pub fn complete(&mut self, form: &mut Form, result: Result<(), MailError>) {
        if let Some(button) = &mut form.submit {
            button.disabled = false;
        }
        match result {
            Ok(()) => self.style.set_form_sent_ok(form),
            Err(e) => {
                warn!(error = %e, "sending form mail failed");
                self.style.set_form_sent_error(form);
            }
        }
    }
}

/// Whether Enter pressed in a control of a managed form must be swallowed.
/// Buttons, submit inputs and textareas keep their Enter behavior.
pub fn blocks_enter_submit(input_type: &str, tag: &str) -> bool {
    if tag.eq_ignore_ascii_case("textarea") || tag.eq_ignore_ascii_case("button") {
        return false;
    }
    !input_type.eq_ignore_ascii_case("submit")
}
