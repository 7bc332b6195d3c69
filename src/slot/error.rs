//! Slot error types.

use thiserror::Error;

use crate::core::ContextId;
use crate::document::AttrRef;

/// Misuse of the slot protocol by the surrounding pipeline.
///
/// None of these are data-dependent: each one means a caller broke the
/// attach/detach/render contract, so the operation is abandoned and nothing
/// in the document is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("can only detach the first or last context, {context} is neither")]
    DetachMisuse { context: ContextId },

    #[error("trying to direct-set a URL on a slot that does not support it: {location}")]
    DirectSetUnsupported { location: String },

    #[error("fetch slots have no document to render into: {location}")]
    FetchRender { location: String },

    #[error("attribute {attr:?} does not exist in `{document}`")]
    UnknownAttribute { attr: AttrRef, document: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_location() {
        let err = SlotError::FetchRender {
            location: "Fetch of https://example.com/a.png".to_string(),
        };
        assert!(err.to_string().contains("Fetch of https://example.com/a.png"));

        let err = SlotError::DetachMisuse {
            context: ContextId::from_raw(3),
        };
        assert!(err.to_string().contains("ctx#3"));
    }
}
