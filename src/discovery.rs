//! Finding `<img>` elements and giving each CDN image one controller.
//!
//! The host reports elements as it finds them (initial scan, mutation
//! records, or the polling fallback from [`poll_interval`]), in any order and
//! as often as it likes. [`Discovery::enqueue`] guarantees each element is
//! processed at most once; [`Discovery::process_queue`] then runs the batch,
//! the equivalent of a microtask flush.
//!
//! ## Identity without ownership
//!
//! Elements are keyed by the address of their `Rc` allocation and stored as
//! `Weak`. A `Weak` keeps the allocation (not the element) alive, so an
//! address cannot be reused while its entry exists; [`Discovery::prune`]
//! drops entries for elements the host has released.
//!
//! [`poll_interval`]: crate::waits::poll_interval

use crate::codec::is_cdn_image;
use crate::config::LoaderConfig;
use crate::controller::{ResponsiveImage, Step};
use crate::dom::{Element, ImageElement, Viewport, attr};
use crate::waits::Wait;
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Page-session state shared by all controllers: the discovery index.
///
/// Indices are handed out in discovery order and never reused, so the first
/// images found on a page (the ones most likely above the fold) get the
/// lowest numbers.
#[derive(Debug, Default)]
pub struct DiscoveryContext {
    next_index: u64,
}

impl DiscoveryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_index(&mut self) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// Number of indices handed out so far.
    pub fn issued(&self) -> u64 {
        self.next_index
    }
}

type Key = usize;

fn key_of<E>(element: &Rc<E>) -> Key {
    Rc::as_ptr(element) as usize
}

/// Discovery layer for one document (or one subtree of it).
#[derive(Debug)]
pub struct Discovery<E: ImageElement> {
    context: DiscoveryContext,
    config: LoaderConfig,
    seen: HashMap<Key, Weak<E>>,
    queue: VecDeque<Weak<E>>,
    controllers: HashMap<Key, ResponsiveImage<E>>,
}

impl<E: ImageElement> Discovery<E> {
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_context(config, DiscoveryContext::new())
    }

    pub fn with_context(config: LoaderConfig, context: DiscoveryContext) -> Self {
        Self {
            context,
            config,
            seen: HashMap::new(),
            queue: VecDeque::new(),
            controllers: HashMap::new(),
        }
    }

    /// Queue an element for processing. Returns `false` if it was seen before.
    pub fn enqueue(&mut self, image: &Rc<E>) -> bool {
        let key = key_of(image);
        if self.seen.get(&key).is_some_and(|w| w.strong_count() > 0) {
            return false;
        }
        self.seen.insert(key, Rc::downgrade(image));
        self.queue.push_back(Rc::downgrade(image));
        true
    }

    /// Queue every element of a batch (e.g. the images in an added subtree).
    pub fn enqueue_all<'a>(&mut self, images: impl IntoIterator<Item = &'a Rc<E>>) -> usize
    where
        E: 'a,
    {
        images.into_iter().filter(|img| self.enqueue(img)).count()
    }

    /// Process queued elements; returns how many controllers were created.
    pub fn process_queue(&mut self, viewport: Viewport) -> usize {
        let mut created = 0;
        while let Some(weak) = self.queue.pop_front() {
            let Some(image) = weak.upgrade() else {
                continue;
            };
            if self.on_image_added(&image, viewport) {
                created += 1;
            }
        }
        created
    }

    fn on_image_added(&mut self, image: &Rc<E>, viewport: Viewport) -> bool {
        if !image.has_attribute(attr::SRC) {
            match image.attribute(attr::DATA_SRC) {
                Some(backup) => image.set_attribute(attr::SRC, &backup),
                None => {
                    warn!("image without src or data-src found, skipping");
                    return false;
                }
            }
        }
        let src = image.src().unwrap_or_default();
        if !image.has_attribute(attr::DATA_SRC) {
            image.set_attribute(attr::DATA_SRC, &src);
        }
        if !is_cdn_image(&src) {
            debug!(src = %src, "not a CDN image");
            return false;
        }

        let index = match image
            .attribute(attr::CDN_INDEX)
            .and_then(|v| v.parse::<u64>().ok())
        {
            Some(index) => index,
            None => {
                let index = self.context.next_index();
                image.set_attribute(attr::CDN_INDEX, &index.to_string());
                index
            }
        };

        match ResponsiveImage::attach(image, index, &self.config, viewport) {
            Ok(controller) => {
                self.controllers.insert(key_of(image), controller);
                true
            }
            Err(e) => {
                warn!(src = %src, index, error = %e, "skipping CDN image");
                false
            }
        }
    }

    /// Advance every controller to its next suspension point.
    ///
    /// Returns the waits the host has to perform, ordered by discovery index.
    pub fn advance_all(&mut self, viewport: Viewport) -> Vec<(Rc<E>, Wait)> {
        let mut pending: Vec<(u64, Rc<E>, Wait)> = self
            .controllers
            .values_mut()
            .filter_map(|controller| match controller.advance(viewport) {
                Step::Wait(wait) => controller
                    .element()
                    .map(|element| (controller.index(), element, wait)),
                Step::Idle => None,
            })
            .collect();
        pending.sort_by_key(|(index, _, _)| *index);
        pending
            .into_iter()
            .map(|(_, element, wait)| (element, wait))
            .collect()
    }

    pub fn controller(&self, image: &Rc<E>) -> Option<&ResponsiveImage<E>> {
        self.controllers.get(&key_of(image))
    }

    pub fn controller_mut(&mut self, image: &Rc<E>) -> Option<&mut ResponsiveImage<E>> {
        self.controllers.get_mut(&key_of(image))
    }

    pub fn wait_finished(&mut self, image: &Rc<E>, wait: Wait) {
        if let Some(controller) = self.controller_mut(image) {
            controller.wait_finished(wait);
        }
    }

    pub fn on_load(&mut self, image: &Rc<E>) {
        if let Some(controller) = self.controller_mut(image) {
            controller.on_load();
        }
    }

    /// Re-evaluate every image, e.g. once a resize burst has settled.
    pub fn reload_all(&mut self) {
        debug!(images = self.controllers.len(), "reprocessing images");
        for controller in self.controllers.values_mut() {
            controller.reload();
        }
    }

    /// Forget elements the host no longer holds.
    pub fn prune(&mut self) {
        self.seen.retain(|_, weak| weak.strong_count() > 0);
        self.queue.retain(|weak| weak.strong_count() > 0);
        self.controllers
            .retain(|_, controller| controller.element().is_some());
    }

    /// Stop observing: drop controllers and pending work. Elements already
    /// seen stay seen, so reconnecting does not reprocess them.
    pub fn stop(&mut self) {
        self.queue.clear();
        self.controllers.clear();
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn context(&self) -> &DiscoveryContext {
        &self.context
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}
