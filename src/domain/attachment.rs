//! Attachment metadata models
//!
//! The core never owns attachment bytes. It sees two shapes of attachment
//! metadata: the [`AttachmentDescriptor`] index supplied by the external
//! attachment-log collaborator (consumed by the reconciler), and the raw
//! [`InboundAttachment`] parts of a received message whose descriptions are
//! parsed into [`InlineAttachment`] values during payload rewriting.

use serde::{Deserialize, Serialize};

use super::errors::TranslationError;

/// One entry of the externally supplied attachment index.
///
/// Keyed loosely by filename: reconciliation matches by substring
/// containment within the document's file-reference URL, because source
/// systems have been observed to prefix and suffix filenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    pub filename: String,

    /// Declared media type, unvalidated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Post-processed byte length, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    /// Whether this entry stands in for an original that never arrived
    #[serde(default)]
    pub is_placeholder: bool,
}

/// A raw attachment part of a received message, prior to description parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundAttachment {
    /// The `Filename=`/`ContentType=`/... description block
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Parsed form of an inbound attachment description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAttachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub compressed: bool,
    pub large_attachment: bool,
    pub original_base64: bool,
    pub length: Option<u64>,
}

impl InlineAttachment {
    /// Parses an attachment description of the form
    ///
    /// ```text
    /// Filename="scan.pdf" ContentType=application/pdf Compressed=No
    /// LargeAttachment=No OriginalBase64=Yes Length=4096
    /// ```
    ///
    /// Keys may be separated by whitespace or newlines; values may be
    /// quoted. A description without a `Filename` entry is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::InlineAttachmentProcessing`] when the
    /// description carries no filename.
    pub fn parse(description: &str) -> Result<Self, TranslationError> {
        let filename = Self::field(description, "Filename").ok_or_else(|| {
            TranslationError::InlineAttachmentProcessing(format!(
                "no filename in description: {description}"
            ))
        })?;

        Ok(Self {
            filename,
            content_type: Self::field(description, "ContentType"),
            compressed: Self::flag(description, "Compressed"),
            large_attachment: Self::flag(description, "LargeAttachment"),
            original_base64: Self::flag(description, "OriginalBase64"),
            length: Self::field(description, "Length").and_then(|v| v.parse().ok()),
        })
    }

    fn field(description: &str, key: &str) -> Option<String> {
        description.split_whitespace().find_map(|token| {
            let value = token.strip_prefix(key)?.strip_prefix('=')?;
            let value = value.trim_matches('"');
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    fn flag(description: &str, key: &str) -> bool {
        Self::field(description, key).is_some_and(|v| v.eq_ignore_ascii_case("yes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "Filename=\"277F29F1-FEAB-4D36-8CD6-5B5EB9Dd53E8_patient.pdf\" \
         ContentType=application/pdf Compressed=No LargeAttachment=No \
         OriginalBase64=Yes Length=123456";

    #[test]
    fn test_parse_full_description() {
        let attachment = InlineAttachment::parse(DESCRIPTION).unwrap();
        assert_eq!(
            attachment.filename,
            "277F29F1-FEAB-4D36-8CD6-5B5EB9Dd53E8_patient.pdf"
        );
        assert_eq!(attachment.content_type.as_deref(), Some("application/pdf"));
        assert!(!attachment.compressed);
        assert!(!attachment.large_attachment);
        assert!(attachment.original_base64);
        assert_eq!(attachment.length, Some(123456));
    }

    #[test]
    fn test_parse_newline_separated_description() {
        let attachment =
            InlineAttachment::parse("Filename=note.txt\nContentType=text/plain\nCompressed=Yes")
                .unwrap();
        assert_eq!(attachment.filename, "note.txt");
        assert!(attachment.compressed);
        assert_eq!(attachment.length, None);
    }

    #[test]
    fn test_parse_without_filename_is_malformed() {
        let result = InlineAttachment::parse("ContentType=text/plain Length=10");
        assert!(matches!(
            result,
            Err(TranslationError::InlineAttachmentProcessing(_))
        ));
    }

    #[test]
    fn test_parse_ignores_unparseable_length() {
        let attachment =
            InlineAttachment::parse("Filename=note.txt Length=not-a-number").unwrap();
        assert_eq!(attachment.length, None);
    }
}
