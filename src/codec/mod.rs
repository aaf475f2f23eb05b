//! The v2 CDN image URL codec.
//!
//! Every image served by the CDN carries its own metadata in the URL path:
//!
//! ```text
//! v2/<id>/<aspect-code>_<width-code>/<filename>.<ext1>[_<ext2>...]
//!
//! v2/abc123/d_gfedcba/hero.jpg_webp_avif
//!    │      │ │       │    └─ content-negotiated formats: jpg, webp, avif
//!    │      │ │       └─ filename (doubles as default alt text)
//!    │      │ └─ width ladder: 2560, 1920, 1440, 1280, 896, 414, 260
//!    │      └─ aspect ratio 16/9
//!    └─ opaque content id
//! ```
//!
//! Common aspect ratios and widths are abbreviated to a single letter (see
//! [`shortcuts`]). The decoder expands them, the encoder applies them in
//! reverse, so the two directions round-trip.
//!
//! The module is split into:
//! - **Shortcuts**: the fixed letter tables shared by both directions
//! - **Decode**: [`is_cdn_image`] and [`decode`] (path → [`ImageDescriptor`])
//! - **Encode**: [`UrlEncoder`] (descriptor parts → path)
//! - **Location**: [`CdnLocation`], splitting a full `src` around the path

mod decode;
mod encode;
mod location;
pub mod shortcuts;

pub use decode::{decode, is_cdn_image};
pub use encode::UrlEncoder;
pub use location::CdnLocation;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid url format: expected at least 4 path segments, got {segments} in \"{path}\"")]
    Format { path: String, segments: usize },
    #[error("Malformed CDN path \"{path}\": {reason}")]
    Parse { path: String, reason: String },
}

impl CodecError {
    pub(crate) fn parse(path: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Aspect ratio as a pair of positive integers, displayed as `W/H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn as_f64(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Height for a given width, rounded to whole pixels.
    pub fn height_for(self, width: u32) -> u32 {
        (f64::from(width) / self.as_f64()).round() as u32
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.width, self.height)
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = String;

    /// Accepts `W/H`, `W-H` and `W:H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['/', '-', ':'])
            .ok_or_else(|| format!("expected W/H, got \"{s}\""))?;
        let width: u32 = w.trim().parse().map_err(|_| format!("bad width in \"{s}\""))?;
        let height: u32 = h.trim().parse().map_err(|_| format!("bad height in \"{s}\""))?;
        if width == 0 || height == 0 {
            return Err(format!("aspect ratio parts must be positive in \"{s}\""));
        }
        Ok(Self { width, height })
    }
}

/// Decoded form of a v2 path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDescriptor {
    pub id: String,
    #[serde(serialize_with = "serialize_display")]
    pub aspect_ratio: AspectRatio,
    /// Available widths, largest first.
    pub widths: Vec<u32>,
    pub filename: String,
    pub extensions: Vec<String>,
}

impl ImageDescriptor {
    /// Encoder pre-filled with everything except the widths.
    pub fn encoder(&self) -> UrlEncoder {
        UrlEncoder::new(&self.id, &self.filename)
            .aspect_ratio(self.aspect_ratio)
            .extensions(self.extensions.iter().cloned())
    }

    /// Path for a single concrete resolution of this image.
    pub fn encode_single(&self, width: u32) -> String {
        self.encoder().add_width(width).to_string()
    }

    /// Path carrying the full ladder.
    pub fn encode(&self) -> String {
        self.encoder().widths(self.widths.iter().copied()).to_string()
    }

    pub fn largest_width(&self) -> Option<u32> {
        self.widths.first().copied()
    }

    pub fn is_vector(&self) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case("svg"))
    }
}

fn serialize_display<S: serde::Serializer>(
    value: &AspectRatio,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_display_uses_slash() {
        assert_eq!(AspectRatio::new(16, 9).to_string(), "16/9");
    }

    #[test]
    fn aspect_ratio_parses_all_separators() {
        for s in ["16/9", "16-9", "16:9"] {
            assert_eq!(s.parse::<AspectRatio>().unwrap(), AspectRatio::new(16, 9));
        }
        assert!("16".parse::<AspectRatio>().is_err());
        assert!("0/9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn height_for_rounds() {
        assert_eq!(AspectRatio::new(16, 9).height_for(1280), 720);
        assert_eq!(AspectRatio::new(21, 9).height_for(260), 111);
    }

    #[test]
    fn descriptor_serializes_aspect_as_string() {
        let d = decode("v2/abc/d_a/hero.jpg").unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["aspect_ratio"], "16/9");
        assert_eq!(json["widths"], serde_json::json!([260]));
    }

    #[test]
    fn svg_descriptor_is_vector() {
        assert!(decode("v2/abc/a_a/logo.svg").unwrap().is_vector());
        assert!(!decode("v2/abc/a_a/logo.png_webp").unwrap().is_vector());
    }
}
