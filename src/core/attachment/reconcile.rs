//! Attachment-to-document reconciliation
//!
//! An explicit pipeline stage run after the base document mapping: it
//! populates the document's content entry from the external document text
//! and the conversation's attachment index. The stage is pure; it returns a
//! new document value and never fails, only degrades.

use regex::Regex;
use std::sync::OnceLock;

use super::{ABSENT_ATTACHMENT_TOKEN, INVALID_CONTENT_TYPE_NOTE, PLACEHOLDER_VALUE};
use crate::domain::attachment::AttachmentDescriptor;
use crate::domain::extract::ExternalDocument;
use crate::domain::resources::{Attachment, DocumentReference};

fn content_type_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^.*/.*$").expect("valid content type pattern"))
}

/// Populates the content entry of a mapped document from the external
/// document reference and the attachment index.
///
/// - The URL is always the original file reference; placeholders stay
///   traceable.
/// - Size comes from the first index entry whose stored filename is
///   contained in the file-reference URL. No match leaves size unset.
/// - A declared media type is accepted only when shaped `<type>/<subtype>`;
///   otherwise the fixed placeholder is substituted and the
///   invalid-content-type note appended to the description.
/// - A reference containing the absent-attachment token forces the
///   attachment title to the placeholder value.
pub fn reconcile_content(
    mut document: DocumentReference,
    external: &ExternalDocument,
    attachments: &[AttachmentDescriptor],
) -> DocumentReference {
    let Some(text) = external.text.as_ref() else {
        return document;
    };

    let mut attachment = Attachment {
        url: text.reference.clone(),
        ..Default::default()
    };

    if let Some(reference) = text.reference.as_deref() {
        if reference.contains(ABSENT_ATTACHMENT_TOKEN) {
            attachment.title = Some(PLACEHOLDER_VALUE.to_string());
        }
        attachment.size = attachment_size(attachments, reference);
    }

    match text.media_type.as_deref() {
        Some(media_type) if content_type_shape().is_match(media_type) => {
            attachment.content_type = Some(media_type.to_string());
        }
        declared => {
            attachment.content_type = Some(PLACEHOLDER_VALUE.to_string());
            document.description = Some(append_invalid_content_type_note(
                document.description.take(),
            ));
            tracing::info!(
                content_type = declared.unwrap_or(""),
                document_id = %document.id,
                "content type was not a valid MIME type"
            );
        }
    }

    document.content = Some(attachment);
    document
}

fn attachment_size(attachments: &[AttachmentDescriptor], reference: &str) -> Option<u64> {
    attachments
        .iter()
        .find(|descriptor| reference.contains(&descriptor.filename))
        .and_then(|descriptor| descriptor.length)
}

fn append_invalid_content_type_note(description: Option<String>) -> String {
    match description {
        Some(previous) if !previous.is_empty() => {
            format!("{previous} {INVALID_CONTENT_TYPE_NOTE}")
        }
        _ => INVALID_CONTENT_TYPE_NOTE.to_string(),
    }
}
