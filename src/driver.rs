//! Per-document rewrite driver.
//!
//! The driver owns the document being rewritten and everything a slot needs
//! from its surroundings: options, base URL, a document id for diagnostics,
//! and node deletion. It also collates HTML slots so that every rewrite
//! touching the same attribute shares one slot.

use std::collections::BTreeMap;
use std::sync::Arc;

use url::Url;

use crate::config::RewriteOptions;
use crate::core::ResourcePtr;
use crate::document::{AttrRef, Document, ElementId};
use crate::slot::{FetchSlot, HtmlSlot, ResourceSlot, SlotError, SlotLocation, SlotRef};
use crate::{debug, log};

#[derive(Debug)]
pub struct RewriteDriver {
    id: String,
    base_url: Url,
    options: Arc<RewriteOptions>,
    document: Document,
    /// HTML slots keyed by (element, attribute) identity.
    slots: BTreeMap<SlotLocation, SlotRef>,
    delete_count: usize,
}

impl RewriteDriver {
    pub fn new(id: impl Into<String>, base_url: Url, options: Arc<RewriteOptions>) -> Self {
        Self {
            id: id.into(),
            base_url,
            options,
            document: Document::new(),
            slots: BTreeMap::new(),
            delete_count: 0,
        }
    }

    /// Replace the (initially empty) document.
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    /// Stable identifier used in slot location strings.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Base URL that relative references in the document resolve against.
    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[inline]
    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Remove `element` (and its subtree) from the document.
    pub fn delete_node(&mut self, element: ElementId) -> bool {
        self.delete_count += 1;
        let deleted = self.document.delete_element(element);
        if !deleted {
            debug!("driver"; "{}: element {} already removed", self.id, element);
        }
        deleted
    }

    /// Number of `delete_node` requests made so far.
    #[inline]
    pub fn delete_count(&self) -> usize {
        self.delete_count
    }

    // ------------------------------------------------------------------------
    // Slots
    // ------------------------------------------------------------------------

    /// Slot for `attribute`, shared with every earlier caller for the same
    /// attribute.
    ///
    /// A new slot takes `resource`; an existing one keeps its own.
    pub fn get_slot(
        &mut self,
        resource: ResourcePtr,
        attribute: AttrRef,
    ) -> Result<SlotRef, SlotError> {
        let location = SlotLocation::new(attribute);
        if let Some(slot) = self.slots.get(&location) {
            return Ok(Arc::clone(slot));
        }

        let slot = ResourceSlot::from(HtmlSlot::new(resource, attribute, self)?).into_ref();
        self.slots.insert(location, Arc::clone(&slot));
        Ok(slot)
    }

    /// Standalone slot for a resource fetched outside the document.
    pub fn fetch_slot(&self, resource: ResourcePtr) -> SlotRef {
        ResourceSlot::from(FetchSlot::new(resource)).into_ref()
    }

    /// Collated slots in (element, attribute) order.
    pub fn slots(&self) -> impl Iterator<Item = &SlotRef> {
        self.slots.values()
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Render every collated slot that has something to write.
    ///
    /// Slots neither optimized nor marked for deletion keep the document's
    /// original value. Each failure is logged; the first one is returned after
    /// all slots have been tried. Returns the number of slots rendered.
    ///
    /// Every slot is locked in turn, so the caller must not hold a guard on
    /// any of them: `parking_lot::Mutex` is not reentrant and would deadlock.
    pub fn render_slots(&mut self) -> Result<usize, SlotError> {
        let pending: Vec<SlotRef> = self.slots.values().cloned().collect();
        let mut rendered = 0;
        let mut first_error = None;

        for slot in pending {
            let mut slot = slot.lock();
            let state = slot.state();
            if !state.was_optimized() && !state.should_delete_element() {
                continue;
            }

            match slot.render(self) {
                Ok(()) => rendered += 1,
                Err(err) => {
                    log!("error"; "{}: {}", slot.location_string(self), err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        debug!("driver"; "{}: rendered {} of {} slots", self.id, rendered, self.slots.len());
        match first_error {
            Some(err) => Err(err),
            None => Ok(rendered),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UrlResource;

    fn driver() -> (RewriteDriver, AttrRef, AttrRef) {
        let mut doc = Document::new();
        let img = doc.create_element("img", 3, 3);
        let src = doc.add_attribute(img, "src", Some("img/x.png")).unwrap();
        let link = doc.create_element("link", 1, 2);
        let href = doc.add_attribute(link, "href", Some("/a/style.css")).unwrap();

        let driver = RewriteDriver::new(
            "doc1",
            Url::parse("https://example.com/a/").unwrap(),
            Arc::new(RewriteOptions::default()),
        )
        .with_document(doc);
        (driver, src, href)
    }

    #[test]
    fn test_accessors() {
        let (driver, _, _) = driver();
        assert_eq!(driver.id(), "doc1");
        assert_eq!(driver.base_url().as_str(), "https://example.com/a/");
        assert!(driver.options().preserve_url_relativity);
        assert_eq!(driver.document().len(), 2);
        assert_eq!(driver.num_slots(), 0);
    }

    #[test]
    fn test_get_slot_collates_same_attribute() {
        let (mut driver, src, _) = driver();
        let first = driver
            .get_slot(UrlResource::shared("https://example.com/a/img/x.png"), src)
            .unwrap();
        let second = driver
            .get_slot(UrlResource::shared("https://example.com/a/img/other.png"), src)
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(driver.num_slots(), 1);
        assert_eq!(first.lock().resource().url(), "https://example.com/a/img/x.png");
    }

    #[test]
    fn test_get_slot_distinct_attributes() {
        let (mut driver, src, href) = driver();
        let b = driver
            .get_slot(UrlResource::shared("https://example.com/a/style.css"), href)
            .unwrap();
        let a = driver
            .get_slot(UrlResource::shared("https://example.com/a/img/x.png"), src)
            .unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(driver.num_slots(), 2);

        // Iteration follows slot ordering, not insertion
        let order: Vec<AttrRef> = driver
            .slots()
            .map(|slot| slot.lock().as_html().unwrap().attribute())
            .collect();
        assert_eq!(order, vec![src, href]);
    }

    #[test]
    fn test_get_slot_unknown_attribute() {
        let (mut driver, src, _) = driver();
        driver.delete_node(src.element());

        let result = driver.get_slot(UrlResource::shared("https://example.com/a/img/x.png"), src);
        assert!(matches!(result, Err(SlotError::UnknownAttribute { .. })));
        assert_eq!(driver.num_slots(), 0);
    }

    #[test]
    fn test_fetch_slot_not_collated() {
        let (driver, _, _) = driver();
        let slot = driver.fetch_slot(UrlResource::shared("https://example.com/a/x.js"));
        assert!(slot.lock().as_html().is_none());
        assert_eq!(driver.num_slots(), 0);
    }

    #[test]
    fn test_delete_node_counts_requests() {
        let (mut driver, src, _) = driver();
        assert!(driver.delete_node(src.element()));
        assert!(!driver.delete_node(src.element()));
        assert_eq!(driver.delete_count(), 2);
    }

    #[test]
    fn test_render_slots_only_touched_slots() {
        let (mut driver, src, href) = driver();
        let img = driver
            .get_slot(UrlResource::shared("https://example.com/a/img/x.png"), src)
            .unwrap();
        driver
            .get_slot(UrlResource::shared("https://example.com/a/style.css"), href)
            .unwrap();

        {
            let mut img = img.lock();
            img.set_resource(UrlResource::shared("https://example.com/a/img/x.hash.png"));
            img.state_mut().set_was_optimized(true);
        }

        assert_eq!(driver.render_slots().unwrap(), 1);
        let doc = driver.document();
        assert_eq!(doc.attribute(src).unwrap().decoded_value(), Some("img/x.hash.png"));
        assert_eq!(doc.attribute(href).unwrap().decoded_value(), Some("/a/style.css"));
    }

    #[test]
    fn test_render_slots_deletes_marked_elements() {
        let (mut driver, src, href) = driver();
        let link = driver
            .get_slot(UrlResource::shared("https://example.com/a/style.css"), href)
            .unwrap();
        link.lock().state_mut().set_should_delete_element(true);

        assert_eq!(driver.render_slots().unwrap(), 1);
        assert!(!driver.document().contains(href.element()));
        assert!(driver.document().contains(src.element()));

        // Second pass: flag still set, but nothing left to delete
        assert_eq!(driver.render_slots().unwrap(), 1);
        assert_eq!(driver.delete_count(), 1);
    }
}
