//! Element seam between the loader and the host document.
//!
//! The loader never owns elements. The host (a wasm/JS glue layer in the
//! browser, an in-memory fake in tests) implements these traits over its own
//! nodes and hands them out as `Rc<E>`; controllers keep only `Weak<E>`.
//!
//! Mutators take `&self`, mirroring the DOM: several parties hold references
//! to the same node and attribute writes go through interior mutability.

/// Attribute, class and inline-style access common to all elements.
pub trait Element {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    /// Set an inline style property (CSS property name, e.g. `background-image`).
    fn set_style(&self, property: &str, value: &str);
}

/// An `<img>` element.
pub trait ImageElement: Element {
    /// Rendered box width in CSS pixels; `0.0` when not laid out.
    fn rendered_width(&self) -> f64;

    /// Whether the element is still attached to the document.
    fn is_connected(&self) -> bool;

    fn src(&self) -> Option<String> {
        self.attribute("src")
    }
}

/// Viewport measurements at the moment of a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Inner width in CSS pixels.
    pub width: f64,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Self { width }
    }
}

/// Attribute names and classes the loader reads or writes.
pub mod attr {
    pub const SRC: &str = "src";
    pub const DATA_SRC: &str = "data-src";
    pub const SIZE_ADJUST: &str = "data-size-adjust";
    pub const LOADING: &str = "loading";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const ALT: &str = "alt";
    /// Discovery index, assigned once per element.
    pub const CDN_INDEX: &str = "data-cdn-idx";

    pub const CLASS_LOADER: &str = "micx-image-loader";
    pub const CLASS_LOADED: &str = "loaded";
}
