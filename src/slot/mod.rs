//! Resource slots: where a rewritten resource gets written back.
//!
//! A rewrite context never edits the document directly. It attaches itself to
//! a slot, swaps in the rewritten resource, and the slot later renders the
//! result into whatever it stands for.
//!
//! # Variants
//!
//! | Variant    | Backing                    | `render`                         |
//! |------------|----------------------------|----------------------------------|
//! | `Fetch`    | nothing (direct fetch)     | always a misuse error            |
//! | `Html`     | element + attribute handle | rewrite attribute or delete node |
//!
//! # Context discipline
//!
//! ```text
//! add_context(c1) add_context(c2) add_context(c3)
//!   front -> [c1, c2, c3] <- back
//! detach_context(c1) ok    detach_context(c3) ok    detach_context(c2) ok
//! detach_context(c2) with [c1, c2, c3]  -> SlotError::DetachMisuse
//! ```

mod error;
mod fetch;
mod html;
mod ordering;
mod state;


use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{ContextId, ResourcePtr};
use crate::driver::RewriteDriver;

pub use error::SlotError;
pub use fetch::FetchSlot;
pub use html::HtmlSlot;
pub use ordering::{SlotLocation, compare_slots, slot_less};
pub use state::SlotState;

/// Shared handle to a slot. Rewrite contexts and the driver each hold one.
pub type SlotRef = Arc<Mutex<ResourceSlot>>;

/// A slot of either kind.
#[derive(Debug)]
pub enum ResourceSlot {
    Fetch(FetchSlot),
    Html(HtmlSlot),
}

impl ResourceSlot {
    /// Wrap into a shared [`SlotRef`].
    pub fn into_ref(self) -> SlotRef {
        Arc::new(Mutex::new(self))
    }

    #[inline]
    pub fn state(&self) -> &SlotState {
        match self {
            Self::Fetch(slot) => slot.state(),
            Self::Html(slot) => slot.state(),
        }
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut SlotState {
        match self {
            Self::Fetch(slot) => slot.state_mut(),
            Self::Html(slot) => slot.state_mut(),
        }
    }

    pub fn as_html(&self) -> Option<&HtmlSlot> {
        match self {
            Self::Html(slot) => Some(slot),
            Self::Fetch(_) => None,
        }
    }

    pub fn as_html_mut(&mut self) -> Option<&mut HtmlSlot> {
        match self {
            Self::Html(slot) => Some(slot),
            Self::Fetch(_) => None,
        }
    }

    // ------------------------------------------------------------------------
    // Shared state shortcuts
    // ------------------------------------------------------------------------

    #[inline]
    pub fn resource(&self) -> &ResourcePtr {
        self.state().resource()
    }

    pub fn set_resource(&mut self, resource: ResourcePtr) {
        self.state_mut().set_resource(resource);
    }

    pub fn add_context(&mut self, context: ContextId) {
        self.state_mut().add_context(context);
    }

    #[inline]
    pub fn last_context(&self) -> Option<ContextId> {
        self.state().last_context()
    }

    pub fn detach_context(&mut self, context: ContextId) -> Result<(), SlotError> {
        self.state_mut().detach_context(context)
    }

    // ------------------------------------------------------------------------
    // Write-back
    // ------------------------------------------------------------------------

    /// Write the current resource back into whatever this slot stands for.
    pub fn render(&mut self, driver: &mut RewriteDriver) -> Result<(), SlotError> {
        match self {
            Self::Fetch(slot) => slot.render(),
            Self::Html(slot) => slot.render(driver),
        }
    }

    /// Assign `url` directly, bypassing relativity handling.
    ///
    /// Only HTML slots have somewhere to put it.
    pub fn direct_set_url(
        &mut self,
        driver: &mut RewriteDriver,
        url: &str,
    ) -> Result<(), SlotError> {
        match self {
            Self::Fetch(slot) => slot.direct_set_url(url),
            Self::Html(slot) => slot.direct_set_url(driver, url),
        }
    }

    /// Human-readable position for diagnostics.
    pub fn location_string(&self, driver: &RewriteDriver) -> String {
        match self {
            Self::Fetch(slot) => slot.location_string(),
            Self::Html(slot) => slot.location_string(driver),
        }
    }
}

impl From<FetchSlot> for ResourceSlot {
    fn from(slot: FetchSlot) -> Self {
        Self::Fetch(slot)
    }
}

impl From<HtmlSlot> for ResourceSlot {
    fn from(slot: HtmlSlot) -> Self {
        Self::Html(slot)
    }
}
