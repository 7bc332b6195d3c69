//! Slot for resources requested directly, outside any document.

use crate::core::ResourcePtr;
use crate::log;

use super::{SlotError, SlotState};

/// Slot created when a rewritten resource is fetched by URL.
///
/// There is no document behind it, so it can never be rendered.
#[derive(Debug)]
pub struct FetchSlot {
    state: SlotState,
}

impl FetchSlot {
    pub fn new(resource: ResourcePtr) -> Self {
        Self {
            state: SlotState::new(resource),
        }
    }

    #[inline]
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut SlotState {
        &mut self.state
    }

    /// Always fails: a fetch has no document to write back into.
    pub fn render(&self) -> Result<(), SlotError> {
        let location = self.location_string();
        log!("error"; "render requested on fetch slot: {}", location);
        Err(SlotError::FetchRender { location })
    }

    /// Always fails: there is no attribute to assign.
    pub fn direct_set_url(&self, url: &str) -> Result<(), SlotError> {
        let location = self.location_string();
        log!("error"; "cannot direct-set `{}` on {}", url, location);
        Err(SlotError::DirectSetUnsupported { location })
    }

    pub fn location_string(&self) -> String {
        format!("Fetch of {}", self.state.resource().url())
    }
}
