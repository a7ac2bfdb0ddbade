//! Payload attachment-reference rewriting
//!
//! Rewrites every in-payload `file://localhost/<filename>` reference to the
//! attachment's durable storage location. The rewrite is sequential and
//! all-or-nothing: it operates on a working copy, and any failure leaves the
//! caller's payload untouched.

use tracing::debug;

use super::LOCAL_REFERENCE_PREFIX;
use crate::adapters::storage::AttachmentStorage;
use crate::domain::attachment::{InboundAttachment, InlineAttachment};
use crate::domain::errors::{HermesError, TranslationError};
use crate::domain::result::Result;

/// Rewrites local file references in a raw outbound payload to durable
/// storage locations.
///
/// For each attachment the literal pattern
/// `<reference value="file://localhost/<filename>" />` is looked up; every
/// occurrence is replaced with the location obtained from the storage
/// collaborator.
///
/// # Errors
///
/// - [`HermesError::Validation`] when the conversation id is empty.
/// - [`TranslationError::InlineAttachmentProcessing`] when an attachment
///   description is malformed; the rewrite aborts.
/// - [`TranslationError::AttachmentNotFound`] when a declared attachment has
///   no reference in the payload; a declared attachment must always be
///   referenced, so this is fatal for the whole operation.
///
/// On any error the returned payload is never partially rewritten: the
/// working copy is discarded with the error.
pub fn update_attachment_references(
    attachments: &[InboundAttachment],
    conversation_id: &str,
    payload: &str,
    storage: &dyn AttachmentStorage,
) -> Result<String> {
    if conversation_id.is_empty() {
        return Err(HermesError::Validation(
            "ConversationId cannot be null or empty".to_string(),
        ));
    }

    let mut result_payload = payload.to_string();

    for attachment in attachments {
        let inline = InlineAttachment::parse(&attachment.description)?;
        let filename = &inline.filename;

        let needle = format!("<reference value=\"{LOCAL_REFERENCE_PREFIX}{filename}\" />");
        if !result_payload.contains(&needle) {
            return Err(TranslationError::AttachmentNotFound(filename.clone()).into());
        }

        let location = storage
            .get_file_location(filename)
            .map_err(|_| TranslationError::StorageLocation(filename.clone()))?;
        let replacement = format!("<reference value=\"{location}\" />");
        result_payload = result_payload.replace(&needle, &replacement);

        debug!(
            conversation_id,
            filename, "rewrote attachment reference to storage location"
        );
    }

    Ok(result_payload)
}
