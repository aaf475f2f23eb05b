//! Resolution selection against a width ladder.
//!
//! All functions here are pure and testable without any element or browser.
//!
//! ## Policy
//!
//! Round up to the next available rung, clamped at both ends:
//!
//! ```text
//! ladder  2560 1920 1440 1280  896  414  260
//! target   900                  ↑ 896 < 900, stop → 1280
//! target  3000  ↑ first rung already smaller → 2560 (largest)
//! target   100                                  walk ends → 260 (smallest)
//! ```
//!
//! A rung equal to the target qualifies. Never request less than the
//! displayed size when a larger rung exists, never more than the largest.

use crate::codec::ImageDescriptor;

/// Smallest rung `>= target` from a descending ladder, clamped to the
/// ladder's extremes. `None` for an empty ladder.
pub fn select_width(widths: &[u32], target: u32) -> Option<u32> {
    let mut best = *widths.first()?;
    for &w in widths {
        if w < target {
            break;
        }
        best = w;
    }
    Some(best)
}

/// Pixel width to request for an element.
///
/// Uses the rendered box width, or the viewport width when the element has
/// no box yet (not laid out, or a browser reporting zero), scaled by the
/// size adjustment and rounded to whole pixels.
pub fn target_width(box_width: f64, viewport_width: f64, scale: f64) -> u32 {
    let measured = if box_width.is_finite() && box_width > 0.0 {
        box_width
    } else {
        viewport_width
    };
    let target = (measured * scale).round();
    if target.is_finite() && target > 0.0 {
        target as u32
    } else {
        0
    }
}

/// Pre-layout `width`/`height` attributes for an image.
///
/// Judged against the unscaled viewport width so the placeholder reserves
/// the right box before anything is measured.
pub fn placeholder_size(descriptor: &ImageDescriptor, viewport_width: f64) -> Option<(u32, u32)> {
    let viewport = viewport_width.max(0.0).round() as u32;
    let width = select_width(&descriptor.widths, viewport)?;
    Some((width, descriptor.aspect_ratio.height_for(width)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;

    const LADDER: &[u32] = &[2560, 1920, 1440, 1280, 896, 414, 260];

    #[test]
    fn rounds_up_to_next_rung() {
        assert_eq!(select_width(LADDER, 900), Some(1280));
        assert_eq!(select_width(LADDER, 415), Some(896));
    }

    #[test]
    fn clamps_to_largest() {
        assert_eq!(select_width(LADDER, 3000), Some(2560));
    }

    #[test]
    fn clamps_to_smallest() {
        assert_eq!(select_width(LADDER, 100), Some(260));
        assert_eq!(select_width(LADDER, 0), Some(260));
    }

    #[test]
    fn exact_match_keeps_rung() {
        assert_eq!(select_width(LADDER, 1280), Some(1280));
        assert_eq!(select_width(LADDER, 260), Some(260));
        assert_eq!(select_width(LADDER, 2560), Some(2560));
    }

    #[test]
    fn single_rung_ladder() {
        assert_eq!(select_width(&[800], 10), Some(800));
        assert_eq!(select_width(&[800], 10_000), Some(800));
    }

    #[test]
    fn empty_ladder_selects_nothing() {
        assert_eq!(select_width(&[], 500), None);
    }

    #[test]
    fn target_uses_box_width_when_laid_out() {
        assert_eq!(target_width(450.0, 1200.0, 2.0), 900);
    }

    #[test]
    fn target_falls_back_to_viewport_for_empty_box() {
        assert_eq!(target_width(0.0, 1200.0, 1.0), 1200);
        assert_eq!(target_width(f64::NAN, 800.0, 1.5), 1200);
    }

    #[test]
    fn target_rounds_to_nearest() {
        assert_eq!(target_width(333.4, 0.0, 1.0), 333);
        assert_eq!(target_width(333.5, 0.0, 1.0), 334);
        assert_eq!(target_width(300.0, 0.0, 0.333), 100);
    }

    #[test]
    fn placeholder_matches_ladder_and_aspect() {
        let d = decode("v2/abc/d_gfedcba/hero.jpg").unwrap();
        assert_eq!(placeholder_size(&d, 1200.0), Some((1280, 720)));
        assert_eq!(placeholder_size(&d, 375.0), Some((414, 233)));
        assert_eq!(placeholder_size(&d, 4000.0), Some((2560, 1440)));
    }
}
