//! Path → descriptor.

use super::shortcuts::{aspect_for_letter, width_for_letter};
use super::{AspectRatio, CodecError, ImageDescriptor};
use regex::Regex;
use std::sync::LazyLock;

/// Structural pattern of an encoded v2 image, anywhere in a relative or
/// absolute URL. The extension group must end the path; a query string or
/// fragment may follow.
static CDN_V2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|/)v2/[^/]+/[^/]+_[^/]+/[^/]+\.[a-z0-9_]+(?:$|[?#])")
        .expect("valid regex")
});

/// Whether `url` points at a v2-encoded CDN image.
///
/// This is a structural check only; a `true` result does not guarantee
/// that [`decode`] succeeds (unknown shortcut letters are caught there).
pub fn is_cdn_image(url: &str) -> bool {
    !url.is_empty() && CDN_V2.is_match(url)
}

/// Decode a path starting at the `v2` segment.
///
/// Any `?query` or `#fragment` is ignored. Segments beyond the fourth are
/// ignored as well; use [`is_cdn_image`] first to reject them.
pub fn decode(path: &str) -> Result<ImageDescriptor, CodecError> {
    let clean = path.split(['?', '#']).next().unwrap_or_default();
    let parts: Vec<&str> = clean.split('/').collect();
    if parts.len() < 4 {
        return Err(CodecError::Format {
            path: path.to_string(),
            segments: parts.len(),
        });
    }

    let id = parts[1];
    if id.is_empty() {
        return Err(CodecError::parse(path, "empty content id"));
    }

    let (aspect_code, width_code) = parts[2]
        .split_once('_')
        .ok_or_else(|| CodecError::parse(path, "missing '_' between aspect and widths"))?;
    let (filename, extension_code) = parts[3]
        .split_once('.')
        .ok_or_else(|| CodecError::parse(path, "missing file extension"))?;
    if filename.is_empty() {
        return Err(CodecError::parse(path, "empty filename"));
    }

    let extensions: Vec<String> = extension_code
        .split('_')
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect();
    if extensions.is_empty() {
        return Err(CodecError::parse(path, "missing file extension"));
    }

    Ok(ImageDescriptor {
        id: id.to_string(),
        aspect_ratio: expand_aspect(aspect_code).map_err(|r| CodecError::parse(path, r))?,
        widths: expand_widths(width_code).map_err(|r| CodecError::parse(path, r))?,
        filename: filename.to_string(),
        extensions,
    })
}

/// `d` → 16/9, `4-5` → 4/5.
fn expand_aspect(code: &str) -> Result<AspectRatio, String> {
    let mut expanded = String::with_capacity(code.len() + 4);
    for c in code.chars() {
        if c.is_ascii_alphabetic() {
            let (w, h) = aspect_for_letter(c)
                .ok_or_else(|| format!("unknown aspect shortcut '{c}'"))?;
            expanded.push_str(&format!("{w}-{h}"));
        } else {
            expanded.push(c);
        }
    }

    let parts: Vec<&str> = expanded.split('-').collect();
    let [w, h] = parts.as_slice() else {
        return Err(format!("aspect code \"{code}\" is not a W-H pair"));
    };
    let width = positive(w).ok_or_else(|| format!("bad aspect width in \"{code}\""))?;
    let height = positive(h).ok_or_else(|| format!("bad aspect height in \"{code}\""))?;
    Ok(AspectRatio::new(width, height))
}

/// `gfe` → [2560, 1920, 1440]; literal numbers are `-`-separated and may be
/// mixed with letters (`g-1000b`).
fn expand_widths(code: &str) -> Result<Vec<u32>, String> {
    let mut expanded = String::with_capacity(code.len() * 4);
    for c in code.chars() {
        if c.is_ascii_alphabetic() {
            let w = width_for_letter(c).ok_or_else(|| format!("unknown width shortcut '{c}'"))?;
            expanded.push('-');
            expanded.push_str(&w.to_string());
            expanded.push('-');
        } else {
            expanded.push(c);
        }
    }

    let widths = expanded
        .split('-')
        .filter(|p| !p.trim().is_empty())
        .map(|p| positive(p).ok_or_else(|| format!("bad width \"{p}\" in \"{code}\"")))
        .collect::<Result<Vec<u32>, String>>()?;
    if widths.is_empty() {
        return Err(format!("width code \"{code}\" is empty"));
    }
    Ok(widths)
}

fn positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|&v| v > 0)
}
