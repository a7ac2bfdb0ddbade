//! Attachment reconciliation and payload reference rewriting
//!
//! Two concerns share this module: [`reconcile`] ties the externally
//! delivered attachment index back into mapped document references, and
//! [`rewrite`] rewrites in-payload file references to durable storage
//! locations. Reconciliation only ever degrades; rewriting is
//! all-or-nothing.

pub mod reconcile;
pub mod rewrite;

/// Token marking a file reference as a placeholder for an absent original
pub const ABSENT_ATTACHMENT_TOKEN: &str = "AbsentAttachment";

/// Fixed placeholder substituted for missing descriptions, titles and
/// invalid content types
pub const PLACEHOLDER_VALUE: &str =
    "GP2GP generated placeholder. Original document not available. See notes for details";

/// Note appended to a document description when the declared media type is
/// not a valid MIME type
pub const INVALID_CONTENT_TYPE_NOTE: &str = "Content type was not a valid MIME type";

/// Prefix of local file references inside received payloads
pub const LOCAL_REFERENCE_PREFIX: &str = "file://localhost/";
