//! MHS outbound request values
//!
//! The core builds the request value; it does not own the connection. Header
//! names and interaction ids are fixed protocol constants.

use serde::{Deserialize, Serialize};

/// Interaction id for large-message continuation requests
pub const CONTINUE_REQUEST_INTERACTION_ID: &str = "COPC_IN000001UK01";

pub const INTERACTION_ID_HEADER: &str = "Interaction-Id";
pub const CORRELATION_ID_HEADER: &str = "Correlation-Id";
pub const MESSAGE_ID_HEADER: &str = "Message-Id";
pub const ODS_CODE_HEADER: &str = "Ods-Code";
pub const WAIT_FOR_RESPONSE_HEADER: &str = "wait-for-response";

/// JSON body wrapper the MHS expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub payload: String,
}

impl OutboundMessage {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// A fully assembled outbound MHS request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub interaction_id: &'static str,
    pub conversation_id: String,
    pub message_id: String,
    pub ods_code: String,
    pub wait_for_response: bool,
    pub body: OutboundMessage,
}

/// Builds a continuation request: fixed interaction id, fresh message id,
/// existing conversation id, wait-for-response disabled.
pub fn build_continue_request(
    conversation_id: impl Into<String>,
    ods_code: impl Into<String>,
    message_id: impl Into<String>,
    body: OutboundMessage,
) -> OutboundRequest {
    OutboundRequest {
        interaction_id: CONTINUE_REQUEST_INTERACTION_ID,
        conversation_id: conversation_id.into(),
        message_id: message_id.into(),
        ods_code: ods_code.into(),
        wait_for_response: false,
        body,
    }
}
