//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Decode
//!
//! ```text
//! hero (abc123)
//!     Aspect: 16/9
//!     Widths: 2560 1920 1440 1280 896 414 260
//!     Formats: jpg, webp
//!     Encoded: v2/abc123/d_gfedcba/hero.jpg_webp
//! ```
//!
//! ## Select
//!
//! ```text
//! hero (abc123)
//!     Target: 900px (box 600px × 1.5)
//!     Chosen: 1280px
//!     URL: https://cdn.example.com/v2/abc123/d_d/hero.jpg_webp
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::codec::ImageDescriptor;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line: filename first, the opaque id as context.
fn descriptor_header(descriptor: &ImageDescriptor) -> String {
    format!("{} ({})", descriptor.filename, descriptor.id)
}

fn join_widths(widths: &[u32]) -> String {
    widths
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Decode
// ============================================================================

pub fn format_descriptor(descriptor: &ImageDescriptor) -> Vec<String> {
    let mut lines = vec![descriptor_header(descriptor)];
    lines.push(format!("{}Aspect: {}", indent(1), descriptor.aspect_ratio));
    lines.push(format!(
        "{}Widths: {}",
        indent(1),
        join_widths(&descriptor.widths)
    ));
    lines.push(format!(
        "{}Formats: {}",
        indent(1),
        descriptor.extensions.join(", ")
    ));
    if descriptor.is_vector() {
        lines.push(format!("{}Vector: served as-is", indent(1)));
    }
    lines.push(format!("{}Encoded: {}", indent(1), descriptor.encode()));
    lines
}

pub fn print_descriptor(descriptor: &ImageDescriptor) {
    for line in format_descriptor(descriptor) {
        println!("{line}");
    }
}

// ============================================================================
// Select
// ============================================================================

/// Outcome of a one-off resolution choice, as shown by `select`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub box_width: f64,
    pub scale: f64,
    pub target: u32,
    pub chosen: u32,
    pub url: String,
}

pub fn format_selection(descriptor: &ImageDescriptor, selection: &Selection) -> Vec<String> {
    let mut lines = vec![descriptor_header(descriptor)];
    let target = if selection.scale == 1.0 {
        format!("{}px", selection.target)
    } else {
        format!(
            "{}px (box {}px × {})",
            selection.target, selection.box_width, selection.scale
        )
    };
    lines.push(format!("{}Target: {target}", indent(1)));
    lines.push(format!("{}Chosen: {}px", indent(1), selection.chosen));
    lines.push(format!("{}URL: {}", indent(1), selection.url));
    lines
}

pub fn print_selection(descriptor: &ImageDescriptor, selection: &Selection) {
    for line in format_selection(descriptor, selection) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;

    fn hero() -> ImageDescriptor {
        decode("v2/abc123/d_gfedcba/hero.jpg_webp").unwrap()
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn descriptor_lines() {
        let lines = format_descriptor(&hero());
        assert_eq!(
            lines,
            vec![
                "hero (abc123)",
                "    Aspect: 16/9",
                "    Widths: 2560 1920 1440 1280 896 414 260",
                "    Formats: jpg, webp",
                "    Encoded: v2/abc123/d_gfedcba/hero.jpg_webp",
            ]
        );
    }

    #[test]
    fn descriptor_marks_vectors() {
        let logo = decode("v2/x1/a_a/logo.svg").unwrap();
        let lines = format_descriptor(&logo);
        assert!(lines.contains(&"    Vector: served as-is".to_string()));
    }

    #[test]
    fn selection_with_scale() {
        let selection = Selection {
            box_width: 600.0,
            scale: 1.5,
            target: 900,
            chosen: 1280,
            url: "https://cdn.example.com/v2/abc123/d_d/hero.jpg_webp".into(),
        };
        let lines = format_selection(&hero(), &selection);
        assert_eq!(lines[1], "    Target: 900px (box 600px × 1.5)");
        assert_eq!(lines[2], "    Chosen: 1280px");
        assert_eq!(
            lines[3],
            "    URL: https://cdn.example.com/v2/abc123/d_d/hero.jpg_webp"
        );
    }

    #[test]
    fn selection_without_scale() {
        let selection = Selection {
            box_width: 900.0,
            scale: 1.0,
            target: 900,
            chosen: 1280,
            url: "v2/abc123/d_d/hero.jpg_webp".into(),
        };
        assert_eq!(format_selection(&hero(), &selection)[1], "    Target: 900px");
    }
}
