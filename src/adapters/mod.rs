//! External system integrations for Hermes.
//!
//! This module provides the trait boundaries for the collaborators the core
//! depends on, plus their in-process implementations:
//!
//! - [`mhs`] - MHS outbound transport (request values + reqwest client)
//! - [`storage`] - attachment storage location resolution
//! - [`statuslog`] - append-only migration status log

pub mod mhs;
pub mod statuslog;
pub mod storage;
