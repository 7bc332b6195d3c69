//! Resource slots - write-back points for rewritten resources.
//!
//! A rewriting pipeline finds resource references in a document (`src`,
//! `href`, ...), rewrites the resources, and then has to put the new URLs
//! back. Slots sit between the two halves:
//!
//! ```text
//! ┌──────────────┐  get_slot   ┌──────────────┐  render   ┌──────────────┐
//! │ RewriteDriver│ ──────────▶ │  HtmlSlot    │ ────────▶ │  Document    │
//! │  (per doc)   │             │  contexts[]  │           │  attr value  │
//! └──────────────┘             └──────────────┘           └──────────────┘
//!                                ▲        │
//!                  add/detach    │        │ set_resource
//!                                └── rewrite contexts
//! ```
//!
//! - [`slot`]: slot variants, context protocol, ordering
//! - [`driver`]: per-document owner of slots, options and the element table
//! - [`document`]: element table addressed by handle
//! - [`core`]: URL relativity, resources, context ids
//! - [`config`]: `rewrite.toml` loading

pub mod config;
pub mod core;
pub mod document;
pub mod driver;
pub mod logger;
pub mod slot;

pub use config::{ConfigError, RewriteConfig, RewriteOptions};
pub use crate::core::{ContextId, Resource, ResourcePtr, UrlRelativity, UrlResource};
pub use document::{AttrRef, Attribute, Document, Element, ElementId};
pub use driver::RewriteDriver;
pub use slot::{
    FetchSlot, HtmlSlot, ResourceSlot, SlotError, SlotLocation, SlotRef, SlotState, compare_slots,
    slot_less,
};
