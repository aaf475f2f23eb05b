//! Per-element lifecycle of a responsive CDN image.
//!
//! ```text
//!  attach ──► Sized ──┬─ .svg ─────────────► Vector    (nothing to swap)
//!                     ├─ loading="eager" ──► Direct   ─┐
//!                     └─ otherwise ────────► Deferred ─┤ waits done
//!                                                      ▼
//!                               reload ──► Swapped ◄───┘
//!                                  ▲          │ element gone/disconnected
//!                                  └──────────┤
//!                                             ▼
//!                                          Detached
//! ```
//!
//! **Sized** happens inside [`ResponsiveImage::attach`]: `width`/`height`
//! are set from the ladder rung that fits the viewport, so the browser
//! reserves the right box before anything is measured (no layout shift).
//!
//! **Direct** only waits for the document; eager images are LCP candidates
//! and should not sit behind the settle delay. **Deferred** waits until the
//! placeholder is decoded, loaded and settled, because the rendered box
//! width is only meaningful after layout.
//!
//! **Swapped** measures the box, picks a rung, paints the placeholder as a
//! `cover` background (no flash of empty content while the new resource
//! loads) and writes the hi-res `src`. [`ResponsiveImage::on_load`] clears
//! the background afterwards.
//!
//! The controller never owns its element; a swap that outlives the
//! element's removal finds it gone or disconnected and ends in Detached.

use crate::codec::{CdnLocation, CodecError, ImageDescriptor, decode, is_cdn_image};
use crate::config::LoaderConfig;
use crate::dom::{Element, ImageElement, Viewport, attr};
use crate::selector::{placeholder_size, select_width, target_width};
use crate::size_adjust::SizeAdjustRules;
use crate::waits::Wait;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum AttachError {
    #[error("image has no src attribute")]
    MissingSrc,
    #[error("not a CDN v2 image: {0}")]
    NotCdnImage(String),
    #[error("cannot decode CDN image \"{src}\": {source}")]
    Codec {
        src: String,
        #[source]
        source: CodecError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Eager image, waiting for the document before the first swap.
    Direct,
    /// Lazy image, waiting for its placeholder to decode, load and settle.
    Deferred,
    /// Hi-res `src` written. Re-entered on reload.
    Swapped,
    /// Vector source; sized but never swapped.
    Vector,
    /// Element dropped or removed from the document.
    Detached,
}

/// What the host should do next for this controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Perform the wait, then call [`ResponsiveImage::wait_finished`].
    Wait(Wait),
    /// Nothing outstanding.
    Idle,
}

const DIRECT_WAITS: &[Wait] = &[Wait::DocumentLoad];
const DEFERRED_WAITS: &[Wait] = &[
    Wait::ImageDecode,
    Wait::DocumentLoad,
    Wait::ImageLoad,
    Wait::Settle,
];
const RELOAD_WAITS: &[Wait] = &[Wait::Settle];

/// Controller for one `<img>`.
#[derive(Debug)]
pub struct ResponsiveImage<E: ImageElement> {
    element: Weak<E>,
    location: CdnLocation,
    descriptor: ImageDescriptor,
    placeholder_uri: String,
    size_adjust: SizeAdjustRules,
    scale: f64,
    index: u64,
    phase: Phase,
    waits: VecDeque<Wait>,
    swap_pending: bool,
    chosen_width: Option<u32>,
}

impl<E: ImageElement> ResponsiveImage<E> {
    /// Decode the element's `src` and size it for the current viewport.
    ///
    /// Errors mean "leave this element alone"; callers log and move on.
    pub fn attach(
        element: &Rc<E>,
        index: u64,
        config: &LoaderConfig,
        viewport: Viewport,
    ) -> Result<Self, AttachError> {
        let src = element.src().ok_or(AttachError::MissingSrc)?;
        if !is_cdn_image(&src) {
            return Err(AttachError::NotCdnImage(src));
        }
        let location =
            CdnLocation::parse(&src).ok_or_else(|| AttachError::NotCdnImage(src.clone()))?;
        let descriptor = decode(&location.path).map_err(|source| AttachError::Codec {
            src: src.clone(),
            source,
        })?;
        let size_adjust = size_adjust_for(element.as_ref(), config, &src);

        let (phase, waits) = if location.is_svg() || descriptor.is_vector() {
            (Phase::Vector, &[][..])
        } else if element.attribute(attr::LOADING).as_deref() == Some("eager")
            || (!element.has_attribute(attr::LOADING) && index < config.images.eager_leading)
        {
            (Phase::Direct, DIRECT_WAITS)
        } else {
            (Phase::Deferred, DEFERRED_WAITS)
        };

        let controller = Self {
            element: Rc::downgrade(element),
            location,
            descriptor,
            placeholder_uri: src,
            scale: size_adjust.resolve(viewport.width),
            size_adjust,
            index,
            phase,
            waits: waits.iter().copied().collect(),
            swap_pending: phase != Phase::Vector,
            chosen_width: None,
        };
        controller.apply_placeholder_size(element.as_ref(), config, viewport);
        debug!(
            index,
            filename = %controller.descriptor.filename,
            phase = ?controller.phase,
            "attached CDN image"
        );
        Ok(controller)
    }

    /// Sized: reserve the box, mark the element, fill `alt` and `loading`.
    fn apply_placeholder_size(&self, element: &E, config: &LoaderConfig, viewport: Viewport) {
        if let Some((width, height)) = placeholder_size(&self.descriptor, viewport.width) {
            element.set_attribute(attr::WIDTH, &width.to_string());
            element.set_attribute(attr::HEIGHT, &height.to_string());
        }
        element.add_class(attr::CLASS_LOADER);
        if !element.has_attribute(attr::ALT) {
            element.set_attribute(attr::ALT, &self.descriptor.filename);
        }
        if !element.has_attribute(attr::LOADING) {
            let hint = if self.index < config.images.eager_leading {
                "eager"
            } else {
                "lazy"
            };
            element.set_attribute(attr::LOADING, hint);
        }
    }

    /// Run until the next suspension point.
    pub fn advance(&mut self, viewport: Viewport) -> Step {
        if matches!(self.phase, Phase::Vector | Phase::Detached) {
            return Step::Idle;
        }
        if let Some(&wait) = self.waits.front() {
            return Step::Wait(wait);
        }
        if self.swap_pending {
            self.swap(viewport);
        }
        Step::Idle
    }

    /// Report that `wait` has completed. Out-of-order reports are ignored.
    pub fn wait_finished(&mut self, wait: Wait) {
        if self.waits.front() == Some(&wait) {
            self.waits.pop_front();
        } else {
            debug!(index = self.index, ?wait, "ignoring unexpected wait completion");
        }
    }

    /// Re-measure and re-apply the hi-res source, e.g. after a resize.
    ///
    /// Calls before the first swap, or while a reload is already queued,
    /// change nothing.
    pub fn reload(&mut self) {
        if self.phase != Phase::Swapped || self.swap_pending {
            return;
        }
        self.waits.extend(RELOAD_WAITS.iter().copied());
        self.swap_pending = true;
    }

    /// The hi-res resource finished loading.
    pub fn on_load(&mut self) {
        if self.phase != Phase::Swapped {
            return;
        }
        if let Some(element) = self.element.upgrade() {
            element.set_style("background-image", "none");
            element.add_class(attr::CLASS_LOADED);
        }
    }

    fn swap(&mut self, viewport: Viewport) {
        self.swap_pending = false;
        let Some(element) = self.element.upgrade().filter(|e| e.is_connected()) else {
            debug!(index = self.index, "image left the document before swap");
            self.phase = Phase::Detached;
            return;
        };

        self.scale = self.size_adjust.resolve(viewport.width);
        let target = target_width(element.rendered_width(), viewport.width, self.scale);
        let Some(best) = select_width(&self.descriptor.widths, target) else {
            return;
        };
        let url = self
            .location
            .url_for(&self.descriptor.encode_single(best));

        debug!(
            filename = %self.descriptor.filename,
            best,
            target,
            viewport = viewport.width,
            scale = self.scale,
            "best fitting width"
        );

        self.phase = Phase::Swapped;
        self.chosen_width = Some(best);
        if element.src().as_deref() == Some(url.as_str()) {
            // Already showing this rung: no load event will follow.
            element.add_class(attr::CLASS_LOADED);
            return;
        }
        element.set_style("background-size", "cover");
        element.set_style("background-image", &format!("url({})", self.placeholder_uri));
        element.set_attribute(attr::SRC, &url);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Scale adjustment used for the latest measurement.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rung picked by the latest swap.
    pub fn chosen_width(&self) -> Option<u32> {
        self.chosen_width
    }

    pub fn placeholder_uri(&self) -> &str {
        &self.placeholder_uri
    }

    pub fn element(&self) -> Option<Rc<E>> {
        self.element.upgrade()
    }

    pub fn pending_wait(&self) -> Option<Wait> {
        if matches!(self.phase, Phase::Vector | Phase::Detached) {
            None
        } else {
            self.waits.front().copied()
        }
    }
}

/// Rules from `data-size-adjust`, else the configured default. A malformed
/// attribute is logged and treated as "no adjustment".
fn size_adjust_for<E: ImageElement>(element: &E, config: &LoaderConfig, src: &str) -> SizeAdjustRules {
    match element.attribute(attr::SIZE_ADJUST) {
        Some(value) => SizeAdjustRules::parse(Some(&value)).unwrap_or_else(|e| {
            warn!(
                attribute = %value,
                src,
                error = %e,
                "failed to parse data-size-adjust, using scale 1"
            );
            SizeAdjustRules::default()
        }),
        None => config.default_size_adjust(),
    }
}
