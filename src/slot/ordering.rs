//! Identity ordering for HTML slots.
//!
//! Slots are ordered by the element they are bound to, then by the attribute.
//! Two slots compare equal exactly when they would write to the same
//! attribute, which is what collating slots in an ordered map needs. The
//! order says nothing about where elements sit in the document.

use std::cmp::Ordering;

use crate::document::{AttrRef, ElementId};

use super::HtmlSlot;

/// Identity of the attribute an [`HtmlSlot`] writes to.
///
/// Taken from the attribute handle, so it does not change when the slot
/// deletes its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotLocation {
    element: ElementId,
    attribute: AttrRef,
}

impl SlotLocation {
    pub fn new(attribute: AttrRef) -> Self {
        Self {
            element: attribute.element(),
            attribute,
        }
    }

    #[inline]
    pub fn element(&self) -> ElementId {
        self.element
    }

    #[inline]
    pub fn attribute(&self) -> AttrRef {
        self.attribute
    }
}

impl Ord for SlotLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.element
            .cmp(&other.element)
            .then_with(|| self.attribute.cmp(&other.attribute))
    }
}

impl PartialOrd for SlotLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two slots by element, then attribute identity.
pub fn compare_slots(a: &HtmlSlot, b: &HtmlSlot) -> Ordering {
    a.location().cmp(&b.location())
}

/// Strict "less than" over slots, for callers that want a comparator predicate.
pub fn slot_less(a: &HtmlSlot, b: &HtmlSlot) -> bool {
    compare_slots(a, b) == Ordering::Less
}
