//! Descriptor parts → path.

use super::AspectRatio;
use super::shortcuts::{letter_for_aspect, letter_for_width};
use std::fmt;

/// Builder for a v2 path.
///
/// ```
/// # use cdn_image_loader::codec::{AspectRatio, UrlEncoder};
/// let path = UrlEncoder::new("abc123", "hero")
///     .aspect_ratio(AspectRatio::new(16, 9))
///     .add_width(1280)
///     .extensions(["jpg", "webp"])
///     .to_string();
/// assert_eq!(path, "v2/abc123/d_d/hero.jpg_webp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEncoder {
    id: String,
    filename: String,
    aspect: Option<AspectRatio>,
    widths: Vec<u32>,
    extensions: Vec<String>,
}

impl UrlEncoder {
    pub fn new(id: &str, filename: &str) -> Self {
        Self {
            id: id.to_string(),
            filename: filename.to_string(),
            aspect: None,
            widths: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn aspect_ratio(mut self, aspect: AspectRatio) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// Append one width to the ladder.
    pub fn add_width(mut self, width: u32) -> Self {
        self.widths.push(width);
        self
    }

    /// Replace the ladder.
    pub fn widths(mut self, widths: impl IntoIterator<Item = u32>) -> Self {
        self.widths = widths.into_iter().collect();
        self
    }

    pub fn extensions<S: Into<String>>(mut self, extensions: impl IntoIterator<Item = S>) -> Self {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    fn aspect_code(&self) -> String {
        match self.aspect {
            Some(a) => match letter_for_aspect(a.width, a.height) {
                Some(letter) => letter.to_string(),
                None => format!("{}-{}", a.width, a.height),
            },
            None => String::new(),
        }
    }

    /// Letters are written back to back; `-` only separates two literal
    /// numbers, which is the one place the decoder needs it.
    fn width_code(&self) -> String {
        let mut code = String::new();
        let mut prev_literal = false;
        for &w in &self.widths {
            match letter_for_width(w) {
                Some(letter) => {
                    code.push(letter);
                    prev_literal = false;
                }
                None => {
                    if prev_literal {
                        code.push('-');
                    }
                    code.push_str(&w.to_string());
                    prev_literal = true;
                }
            }
        }
        code
    }
}

impl fmt::Display for UrlEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v2/{}/{}_{}/{}.{}",
            self.id,
            self.aspect_code(),
            self.width_code(),
            self.filename,
            self.extensions.join("_")
        )
    }
}
