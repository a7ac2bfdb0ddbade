// Hermes - GP2GP EHR Extract Translation Core
// Copyright (c) 2026 Hermes Contributors
// Licensed under the MIT License

//! # Hermes - GP2GP EHR Extract Translation Core
//!
//! Hermes is the translation core of a patient-record transfer adapter. It
//! converts a received clinical-document tree (a hierarchical EHR extract of
//! nested compositions, compound statements, narrative statements,
//! observation statements and medication statements) into structured
//! clinical resources, plus the cross-references that bind them to a
//! patient, encounter, organization and practitioners.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Classifying** source statements into target resource categories
//! - **Resolving** practitioner and encounter references under a fixed
//!   priority policy
//! - **Mapping** document references, immunizations and the medication
//!   family, with in-band degradation when source data is incomplete
//! - **Reconciling** externally delivered attachments into mapped documents
//!   and rewriting in-payload file references to durable storage locations
//! - **Driving** the large-message continuation protocol and its
//!   migration-status state machine
//!
//! ## Architecture
//!
//! Hermes follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Translation logic (classify, resolve, map, reconcile,
//!   continuation)
//! - [`adapters`] - External collaborators (MHS outbound, attachment
//!   storage, status log)
//! - [`domain`] - Source tree, target resources and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use hermes::core::mapper::{map_extract, MappingContext};
//! use hermes::domain::extract::{EhrExtract, InstanceId};
//!
//! let extract = EhrExtract {
//!     id: InstanceId::new("extract-1"),
//!     availability_time: None,
//!     compositions: vec![],
//! };
//!
//! let context = MappingContext {
//!     patient_id: "patient-1".to_string(),
//!     organization_code: "B83002".to_string(),
//!     ..Default::default()
//! };
//!
//! let mapped = map_extract(&extract, &context);
//! println!("Mapped {} resources", mapped.resources.len());
//! ```
//!
//! ## Concurrency
//!
//! Mapping is pure and synchronous. All inputs are conversation-scoped and
//! passed in; no mutable state is shared across conversations, so distinct
//! conversations may be translated concurrently. The payload rewrite in
//! [`core::attachment::rewrite`] is all-or-nothing over a working copy, and
//! the continuation driver expects a single writer per conversation id.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
