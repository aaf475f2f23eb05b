//! # CDN Image Loader
//!
//! Responsive, bandwidth-aware image loading for images served from a CDN
//! whose URLs describe themselves. The path of every image carries its id,
//! aspect ratio, the ladder of widths the CDN holds, the filename and the
//! formats on offer, so the loader needs no manifest and no extra request to
//! pick the right resolution.
//!
//! # Architecture: Decode, Measure, Swap
//!
//! ```text
//! 1. Decode   src                  →  ImageDescriptor   (pure string work)
//! 2. Measure  rendered box × scale →  target width      (needs layout)
//! 3. Swap     ladder + target      →  new src           (one write per element)
//! ```
//!
//! Only the middle step touches the page, and it is reached through the
//! [`dom`] traits. Everything else is a pure function, which keeps the
//! codec and the selection policy testable without a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`codec`] | The v2 URL codec: `is_cdn_image`, `decode`, `UrlEncoder`, `CdnLocation` |
//! | [`size_adjust`] | `data-size-adjust` rule parser and breakpoint resolution |
//! | [`selector`] | Ladder selection, target width, pre-layout placeholder size |
//! | [`controller`] | Per-image state machine from placeholder to final source |
//! | [`discovery`] | Finds new images, issues indices, owns the controllers |
//! | [`waits`] | Named suspension points, resize debouncing, polling intervals |
//! | [`dom`] | The `Element`/`ImageElement` seam a host implements |
//! | [`config`] | `loader.toml` loading, validation and merging |
//! | [`form`] | Form mail helper: collect, validate, style, submit |
//! | [`markup`] | Server-side `<img>` rendering with Maud |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Sans-IO Controllers
//!
//! A browser image loader is full of awaits: decode, document load, image
//! load, a short settle. Here none of them is performed by the library.
//! A controller returns the [`waits::Wait`] it needs and the host resumes it
//! when the wait is over. The same state machine then runs under a real
//! event loop and under a unit test that completes waits synchronously.
//!
//! ## Weak Element Registry
//!
//! Controllers and the discovery registry hold `Weak` element handles. An
//! element removed from the page is dropped normally and its controller
//! turns into a no-op, so nothing keeps detached DOM alive.
//!
//! ## Explicit Discovery Context
//!
//! Discovery indices decide which images load eagerly. They are issued by a
//! [`discovery::DiscoveryContext`] owned by the caller instead of a
//! process-wide counter, so two loaders on one page (or two tests) never
//! share numbering.

pub mod codec;
pub mod config;
pub mod controller;
pub mod discovery;
pub mod dom;
pub mod form;
pub mod markup;
pub mod output;
pub mod selector;
pub mod size_adjust;
pub mod waits;

#[cfg(test)]
pub(crate) mod test_helpers;
