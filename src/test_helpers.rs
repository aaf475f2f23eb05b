//! Shared test utilities: an in-memory `<img>` and a controller driver.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = FakeImage::with_src("/v2/abc/d_gfe/hero.jpg");
//! img.set_rendered_width(600.0);
//! let mut ctl = ResponsiveImage::attach(&img, 3, &config, Viewport::new(1200.0)).unwrap();
//! let waits = run_to_idle(&mut ctl, Viewport::new(1200.0));
//! assert_eq!(img.src_writes().len(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::controller::{ResponsiveImage, Step};
use crate::dom::{Element, ImageElement, Viewport};
use crate::waits::Wait;

/// In-memory image element. Starts connected with no box.
#[derive(Debug)]
pub struct FakeImage {
    attributes: RefCell<BTreeMap<String, String>>,
    classes: RefCell<BTreeSet<String>>,
    style: RefCell<BTreeMap<String, String>>,
    rendered_width: Cell<f64>,
    connected: Cell<bool>,
    src_writes: RefCell<Vec<String>>,
}

impl FakeImage {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            attributes: RefCell::default(),
            classes: RefCell::default(),
            style: RefCell::default(),
            rendered_width: Cell::new(0.0),
            connected: Cell::new(true),
            src_writes: RefCell::default(),
        })
    }

    /// An image whose markup already carries `src` (not counted as a write).
    pub fn with_src(src: &str) -> Rc<Self> {
        let img = Self::new();
        img.attributes
            .borrow_mut()
            .insert("src".to_string(), src.to_string());
        img
    }

    pub fn set_rendered_width(&self, width: f64) {
        self.rendered_width.set(width);
    }

    pub fn disconnect(&self) {
        self.connected.set(false);
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.style.borrow().get(property).cloned()
    }

    /// Every value written to `src` through the [`Element`] trait, in order.
    pub fn src_writes(&self) -> Vec<String> {
        self.src_writes.borrow().clone()
    }
}

impl Element for FakeImage {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if name == "src" {
            self.src_writes.borrow_mut().push(value.to_string());
        }
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn set_style(&self, property: &str, value: &str) {
        self.style
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }
}

impl ImageElement for FakeImage {
    fn rendered_width(&self) -> f64 {
        self.rendered_width.get()
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }
}

/// Complete every wait a controller asks for until it goes idle.
/// Returns the waits in the order they were requested.
pub fn run_to_idle<E: ImageElement>(
    controller: &mut ResponsiveImage<E>,
    viewport: Viewport,
) -> Vec<Wait> {
    let mut waits = Vec::new();
    while let Step::Wait(wait) = controller.advance(viewport) {
        waits.push(wait);
        controller.wait_finished(wait);
    }
    waits
}
