//! Core translation logic for Hermes.
//!
//! This module contains the translation core: classification, reference
//! resolution, per-resource mapping, attachment reconciliation and the
//! continuation protocol driver.
//!
//! # Modules
//!
//! - [`classify`] - pure statement classification over the extract tree
//! - [`resolve`] - participant and encounter reference resolution
//! - [`mapper`] - per-resource-family mappers and the mapping run
//! - [`attachment`] - attachment reconciliation and payload rewriting
//! - [`continuation`] - large-message continuation protocol driver
//!
//! # Translation Workflow
//!
//! Data flows one way: the raw extract tree is classified, references are
//! resolved, the mappers emit target resources, and the attachment
//! reconciler patches the mapped documents' content entries. The
//! continuation driver runs independently, triggered by transport events,
//! and supplies the attachment index consumed on the next mapping pass.
//!
//! # Example
//!
//! ```
//! use hermes::core::mapper::{map_extract, MappingContext};
//! use hermes::domain::extract::{EhrExtract, InstanceId};
//!
//! let extract = EhrExtract {
//!     id: InstanceId::new("extract-1"),
//!     availability_time: None,
//!     compositions: vec![],
//! };
//! let context = MappingContext {
//!     patient_id: "patient-1".to_string(),
//!     organization_code: "B83002".to_string(),
//!     ..Default::default()
//! };
//!
//! let mapped = map_extract(&extract, &context);
//! assert!(mapped.resources.is_empty());
//! ```

pub mod attachment;
pub mod classify;
pub mod continuation;
pub mod mapper;
pub mod resolve;
