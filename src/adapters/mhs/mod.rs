//! MHS outbound integration
//!
//! Request value construction ([`request`]) and the transport boundary
//! ([`client`]). The continuation driver composes the two.

pub mod client;
pub mod request;

pub use client::{HttpMhsClient, MhsOutboundClient};
pub use request::{build_continue_request, OutboundMessage, OutboundRequest};
