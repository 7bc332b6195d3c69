//! Slot bound to one attribute of a live document.
//!
//! Rendering follows three mutually exclusive paths:
//!
//! | State                      | Effect                                   |
//! |----------------------------|------------------------------------------|
//! | rendering disabled         | nothing                                  |
//! | element deletion requested | element removed once, handle cleared     |
//! | otherwise                  | attribute set to the resource URL        |
//!
//! The URL is written in the relativity class the attribute had when the
//! slot was created, unless the driver's options ask for absolute URLs.

use url::Url;

use crate::core::{ResourcePtr, UrlRelativity};
use crate::document::{AttrRef, ElementId};
use crate::driver::RewriteDriver;
use crate::{debug, log};

use super::{SlotError, SlotLocation, SlotState};

#[derive(Debug)]
pub struct HtmlSlot {
    state: SlotState,
    /// Cleared once this slot deletes the element.
    element: Option<ElementId>,
    attribute: AttrRef,
    /// Form of the attribute value before any rewrite. Never recomputed.
    url_relativity: UrlRelativity,
    begin_line: u32,
    end_line: u32,
}

impl HtmlSlot {
    /// Bind `resource` to `attribute` in the driver's document.
    ///
    /// The attribute's current value must be the URL `resource` was created
    /// from: its relativity is frozen here and reused for every render.
    pub fn new(
        resource: ResourcePtr,
        attribute: AttrRef,
        driver: &RewriteDriver,
    ) -> Result<Self, SlotError> {
        let document = driver.document();
        let unknown = || SlotError::UnknownAttribute {
            attr: attribute,
            document: driver.id().to_string(),
        };

        let element = document.element(attribute.element()).ok_or_else(unknown)?;
        let value = document.attribute(attribute).ok_or_else(unknown)?;

        Ok(Self {
            state: SlotState::new(resource),
            element: Some(attribute.element()),
            attribute,
            url_relativity: UrlRelativity::find(value.decoded_value()),
            begin_line: element.begin_line(),
            end_line: element.end_line(),
        })
    }

    #[inline]
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut SlotState {
        &mut self.state
    }

    /// Bound element, `None` after this slot deleted it.
    #[inline]
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    #[inline]
    pub fn attribute(&self) -> AttrRef {
        self.attribute
    }

    #[inline]
    pub fn url_relativity(&self) -> UrlRelativity {
        self.url_relativity
    }

    #[inline]
    pub fn begin_line(&self) -> u32 {
        self.begin_line
    }

    #[inline]
    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    /// Ordering key; stable for the lifetime of the slot.
    #[inline]
    pub fn location(&self) -> SlotLocation {
        SlotLocation::new(self.attribute)
    }

    /// Write the current resource back into the document.
    ///
    /// Precondition: the bound element is only removed through this slot's
    /// deletion flag. An element removed out-of-band is reported but tolerated.
    pub fn render(&mut self, driver: &mut RewriteDriver) -> Result<(), SlotError> {
        if self.state.disable_rendering() {
            return Ok(());
        }

        if self.state.should_delete_element() {
            if let Some(element) = self.element.take() {
                driver.delete_node(element);
                debug!("slot"; "deleted element at {}", self.location_string(driver));
            }
            return Ok(());
        }

        let url = self.output_url(driver);
        self.direct_set_url(driver, &url)
    }

    /// URL to write, in the original relativity when configured.
    fn output_url(&self, driver: &RewriteDriver) -> String {
        let resource_url = self.state.resource().url();
        if !driver.options().preserve_url_relativity {
            return resource_url.to_string();
        }

        match Url::parse(resource_url) {
            Ok(url) => self.url_relativity.relativize(&url, driver.base_url()),
            Err(err) => {
                debug!("slot"; "keeping unparseable url `{}` ({})", resource_url, err);
                resource_url.to_string()
            }
        }
    }

    /// Assign `url` to the bound attribute.
    pub fn direct_set_url(
        &mut self,
        driver: &mut RewriteDriver,
        url: &str,
    ) -> Result<(), SlotError> {
        if let Some(attr) = driver.document_mut().attribute_mut(self.attribute) {
            attr.set_value(url);
            return Ok(());
        }

        // Element went away without going through the deletion flag.
        log!(
            "error";
            "attribute for {} is gone, dropping `{}`",
            self.location_string(driver),
            url
        );
        Ok(())
    }

    /// `<id>:<line>` or `<id>:<begin>-<end>` for multi-line elements.
    pub fn location_string(&self, driver: &RewriteDriver) -> String {
        if self.begin_line == self.end_line {
            format!("{}:{}", driver.id(), self.begin_line)
        } else {
            format!("{}:{}-{}", driver.id(), self.begin_line, self.end_line)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
