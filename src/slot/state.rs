//! State shared by every slot variant.

use std::collections::VecDeque;

use crate::core::{ContextId, ResourcePtr};
use crate::log;

use super::SlotError;

/// Resource reference, attached contexts and render flags of a slot.
///
/// All mutation happens on the document's own timeline; the flags have a
/// single writer (the context that currently owns the slot).
#[derive(Debug)]
pub struct SlotState {
    resource: ResourcePtr,
    /// Attached contexts, oldest first. Only either end may be detached.
    contexts: VecDeque<ContextId>,
    disable_rendering: bool,
    should_delete_element: bool,
    was_optimized: bool,
}

impl SlotState {
    pub fn new(resource: ResourcePtr) -> Self {
        Self {
            resource,
            contexts: VecDeque::new(),
            disable_rendering: false,
            should_delete_element: false,
            was_optimized: false,
        }
    }

    #[inline]
    pub fn resource(&self) -> &ResourcePtr {
        &self.resource
    }

    /// Point the slot at another (or the same) resource.
    pub fn set_resource(&mut self, resource: ResourcePtr) {
        self.resource = resource;
    }

    // ------------------------------------------------------------------------
    // Contexts
    // ------------------------------------------------------------------------

    /// Attach `context` as the most recent user of this slot.
    pub fn add_context(&mut self, context: ContextId) {
        self.contexts.push_back(context);
    }

    /// Most recently attached context, if any.
    #[inline]
    pub fn last_context(&self) -> Option<ContextId> {
        self.contexts.back().copied()
    }

    #[inline]
    pub fn num_contexts(&self) -> usize {
        self.contexts.len()
    }

    /// Context at `index`, oldest first.
    #[inline]
    pub fn context(&self, index: usize) -> Option<ContextId> {
        self.contexts.get(index).copied()
    }

    /// Detach `context` from whichever end of the queue it occupies.
    ///
    /// The front is checked first, so a context attached twice in a row is
    /// removed from the oldest end. Detaching from the middle (or from an
    /// empty queue) leaves the queue untouched and fails.
    pub fn detach_context(&mut self, context: ContextId) -> Result<(), SlotError> {
        if self.contexts.front() == Some(&context) {
            self.contexts.pop_front();
        } else if self.contexts.back() == Some(&context) {
            self.contexts.pop_back();
        } else {
            log!("error"; "can only detach first or last context, got {}", context);
            return Err(SlotError::DetachMisuse { context });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------------

    #[inline]
    pub fn disable_rendering(&self) -> bool {
        self.disable_rendering
    }

    /// Turn render into a no-op for this slot.
    pub fn set_disable_rendering(&mut self, disable: bool) {
        self.disable_rendering = disable;
    }

    #[inline]
    pub fn should_delete_element(&self) -> bool {
        self.should_delete_element
    }

    /// Make render remove the element instead of rewriting its attribute.
    pub fn set_should_delete_element(&mut self, delete: bool) {
        self.should_delete_element = delete;
    }

    #[inline]
    pub fn was_optimized(&self) -> bool {
        self.was_optimized
    }

    /// Record that a context produced a new resource for this slot.
    pub fn set_was_optimized(&mut self, optimized: bool) {
        self.was_optimized = optimized;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UrlResource;
    use std::sync::Arc;

    fn state() -> SlotState {
        SlotState::new(UrlResource::shared("https://example.com/a.png"))
    }

    fn ids(n: u64) -> Vec<ContextId> {
        (1..=n).map(ContextId::from_raw).collect()
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = state();
        assert_eq!(state.last_context(), None);
        assert_eq!(state.num_contexts(), 0);
        assert!(!state.disable_rendering());
        assert!(!state.should_delete_element());
        assert!(!state.was_optimized());
    }

    #[test]
    fn test_last_context_is_most_recent() {
        let mut state = state();
        let ctx = ids(3);
        for id in &ctx {
            state.add_context(*id);
        }
        assert_eq!(state.last_context(), Some(ctx[2]));
        assert_eq!(state.context(0), Some(ctx[0]));
        assert_eq!(state.context(3), None);
    }

    #[test]
    fn test_detach_stack_order_empties_queue() {
        let mut state = state();
        let ctx = ids(4);
        for id in &ctx {
            state.add_context(*id);
        }
        for id in ctx.iter().rev() {
            state.detach_context(*id).unwrap();
        }
        assert_eq!(state.num_contexts(), 0);
        assert_eq!(state.last_context(), None);
    }

    #[test]
    fn test_detach_queue_order_empties_queue() {
        let mut state = state();
        let ctx = ids(4);
        for id in &ctx {
            state.add_context(*id);
        }
        for id in &ctx {
            state.detach_context(*id).unwrap();
        }
        assert_eq!(state.last_context(), None);
    }

    #[test]
    fn test_detach_alternating_ends() {
        let mut state = state();
        let ctx = ids(5);
        for id in &ctx {
            state.add_context(*id);
        }
        // front, back, front, back, last remaining
        for id in [ctx[0], ctx[4], ctx[1], ctx[3], ctx[2]] {
            state.detach_context(id).unwrap();
        }
        assert_eq!(state.last_context(), None);
    }

    #[test]
    fn test_detach_middle_is_misuse() {
        let mut state = state();
        let ctx = ids(3);
        for id in &ctx {
            state.add_context(*id);
        }

        let err = state.detach_context(ctx[1]).unwrap_err();
        assert_eq!(err, SlotError::DetachMisuse { context: ctx[1] });
        // Queue untouched
        assert_eq!(state.num_contexts(), 3);
        assert_eq!(state.context(1), Some(ctx[1]));
    }

    #[test]
    fn test_detach_unknown_or_empty_is_misuse() {
        let mut state = state();
        assert!(state.detach_context(ContextId::from_raw(9)).is_err());

        state.add_context(ContextId::from_raw(1));
        assert!(state.detach_context(ContextId::from_raw(9)).is_err());
        assert_eq!(state.num_contexts(), 1);
    }

    #[test]
    fn test_detach_duplicate_removes_front_first() {
        let mut state = state();
        let a = ContextId::from_raw(1);
        let b = ContextId::from_raw(2);
        state.add_context(a);
        state.add_context(b);
        state.add_context(a);

        state.detach_context(a).unwrap();
        assert_eq!(state.context(0), Some(b));
        assert_eq!(state.last_context(), Some(a));
    }

    #[test]
    fn test_set_resource_swaps_reference_only() {
        let mut state = state();
        state.add_context(ContextId::from_raw(1));
        state.set_disable_rendering(true);

        let rewritten = UrlResource::shared("https://example.com/a.hash.png");
        state.set_resource(Arc::clone(&rewritten));

        assert!(Arc::ptr_eq(state.resource(), &rewritten));
        assert_eq!(state.num_contexts(), 1);
        assert!(state.disable_rendering());
    }
}
