//! Document element table.
//!
//! Elements live in a table keyed by [`ElementId`]; everything outside the
//! document (slots, rewrite contexts) refers to them by handle only. Deleting
//! an element removes it and its subtree from the table, so stale handles
//! simply stop resolving.
//!
//! ```text
//! Document
//! ├── ElementId(1) <div>          lines 3-9
//! │   └── ElementId(2) <img>      line 4
//! │       ├── AttrRef(2, 0) src="img/a.png"
//! │       └── AttrRef(2, 1) alt="logo"
//! └── ElementId(3) <script>       line 11
//! ```

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

// =============================================================================
// Handles
// =============================================================================

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to one attribute of one element.
///
/// Ordering is by element first, then by attribute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrRef {
    element: ElementId,
    index: u32,
}

impl AttrRef {
    /// Element that owns the attribute.
    #[inline]
    pub const fn element(self) -> ElementId {
        self.element
    }

    /// Position of the attribute within its element.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// A single `name="value"` pair. The value is stored decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: Option<String>,
}

impl Attribute {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded value, `None` for valueless attributes such as `<img src>`.
    #[inline]
    pub fn decoded_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Replace the value.
    pub fn set_value(&mut self, value: &str) {
        self.value = Some(value.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attrs: SmallVec<[Attribute; 4]>,
    begin_line: u32,
    end_line: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source line of the start tag.
    #[inline]
    pub fn begin_line(&self) -> u32 {
        self.begin_line
    }

    /// Source line of the end tag (equal to `begin_line` for single-line elements).
    #[inline]
    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    #[inline]
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attrs
    }
}

// =============================================================================
// Document
// =============================================================================

/// Table of live elements addressed by handle.
#[derive(Debug, Default)]
pub struct Document {
    elements: FxHashMap<ElementId, Element>,
    roots: Vec<ElementId>,
    next_id: u32,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a top-level element spanning `begin_line..=end_line`.
    pub fn create_element(&mut self, name: &str, begin_line: u32, end_line: u32) -> ElementId {
        let id = self.alloc_element(name, begin_line, end_line, None);
        self.roots.push(id);
        id
    }

    /// Create an element as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is no longer in the document.
    pub fn append_child(
        &mut self,
        parent: ElementId,
        name: &str,
        begin_line: u32,
        end_line: u32,
    ) -> Option<ElementId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.alloc_element(name, begin_line, end_line, Some(parent));
        self.elements.get_mut(&parent)?.children.push(id);
        Some(id)
    }

    fn alloc_element(
        &mut self,
        name: &str,
        begin_line: u32,
        end_line: u32,
        parent: Option<ElementId>,
    ) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.elements.insert(
            id,
            Element {
                name: name.to_ascii_lowercase(),
                attrs: SmallVec::new(),
                begin_line,
                end_line,
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    /// Append an attribute to `element`.
    ///
    /// Returns `None` if `element` is no longer in the document.
    pub fn add_attribute(
        &mut self,
        element: ElementId,
        name: &str,
        value: Option<&str>,
    ) -> Option<AttrRef> {
        let elem = self.elements.get_mut(&element)?;
        let index = u32::try_from(elem.attrs.len()).ok()?;
        elem.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.map(str::to_string),
        });
        Some(AttrRef { element, index })
    }

    /// Handle of the first attribute called `name` on `element`.
    pub fn find_attribute(&self, element: ElementId, name: &str) -> Option<AttrRef> {
        let elem = self.elements.get(&element)?;
        let index = elem
            .attrs
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))?;
        Some(AttrRef {
            element,
            index: u32::try_from(index).ok()?,
        })
    }

    #[inline]
    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains_key(&element)
    }

    #[inline]
    pub fn element(&self, element: ElementId) -> Option<&Element> {
        self.elements.get(&element)
    }

    pub fn attribute(&self, attr: AttrRef) -> Option<&Attribute> {
        self.elements
            .get(&attr.element)?
            .attrs
            .get(attr.index as usize)
    }

    pub fn attribute_mut(&mut self, attr: AttrRef) -> Option<&mut Attribute> {
        self.elements
            .get_mut(&attr.element)?
            .attrs
            .get_mut(attr.index as usize)
    }

    /// Top-level elements in insertion order.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove `element` and its whole subtree.
    ///
    /// Returns `false` if the element was already gone.
    pub fn delete_element(&mut self, element: ElementId) -> bool {
        let Some(removed) = self.elements.remove(&element) else {
            return false;
        };

        match removed.parent {
            Some(parent) => {
                if let Some(parent) = self.elements.get_mut(&parent) {
                    parent.children.retain(|child| *child != element);
                }
            }
            None => self.roots.retain(|root| *root != element),
        }

        let mut pending = removed.children;
        while let Some(child) = pending.pop() {
            if let Some(node) = self.elements.remove(&child) {
                pending.extend(node.children);
            }
        }
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
