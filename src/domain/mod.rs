//! Domain models and types for Hermes.
//!
//! This module contains the core domain models, types, and business rules
//! for the translation core.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **The source tree** ([`extract::EhrExtract`] and its statement kinds),
//!   the read-only boundary type produced by the external deserialization
//!   layer
//! - **Target resources** ([`resources::TargetResource`] and the per-kind
//!   records it wraps)
//! - **Attachment metadata** ([`attachment::AttachmentDescriptor`],
//!   [`attachment::InlineAttachment`])
//! - **Migration status** ([`status::MigrationStatus`])
//! - **Error types** ([`HermesError`], [`TranslationError`], [`MhsError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```
//! use hermes::domain::{HermesError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(HermesError::Validation("ConversationId cannot be empty".to_string()))
//! }
//! # assert!(example().is_err());
//! ```

pub mod attachment;
pub mod errors;
pub mod extract;
pub mod resources;
pub mod result;
pub mod status;

// Re-export commonly used types for convenience
pub use attachment::{AttachmentDescriptor, InboundAttachment, InlineAttachment};
pub use errors::{HermesError, MhsError, TranslationError};
pub use extract::{EhrComposition, EhrExtract, Statement};
pub use resources::TargetResource;
pub use result::Result;
pub use status::MigrationStatus;
