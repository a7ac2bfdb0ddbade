//! Continuation protocol driver
//!
//! When an extract's attachments or parts exceed one transmission, the
//! driver builds and dispatches the outbound continue request for the
//! conversation and advances the migration status. Transport failures are
//! status transitions, never crashes; the caller learns the outcome from
//! the returned flag.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::adapters::mhs::{build_continue_request, MhsOutboundClient, OutboundMessage};
use crate::adapters::statuslog::MigrationStatusLog;
use crate::domain::result::Result;
use crate::domain::status::MigrationStatus;

/// Status recorded when the MHS accepts the continue request.
///
/// The upstream adapter recorded these two statuses the other way round
/// (error path logged accepted, success path logged error). The pairing
/// here is the evidently intended one; swap the constants deliberately if
/// byte-for-byte legacy parity is ever required.
const STATUS_ON_ACCEPT: MigrationStatus = MigrationStatus::ContinueRequestAccepted;

/// Status recorded when the MHS rejects the continue request.
const STATUS_ON_ERROR: MigrationStatus = MigrationStatus::ContinueRequestError;

/// Everything needed to build one continue request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinueRequestData {
    pub conversation_id: String,
    pub nhs_number: String,
    pub to_ods_code: String,
    pub from_asid: String,
    pub to_asid: String,
}

/// Builds, dispatches and records continuation requests
pub struct ContinuationDriver {
    mhs: Arc<dyn MhsOutboundClient>,
    status_log: Arc<dyn MigrationStatusLog>,
}

impl ContinuationDriver {
    pub fn new(mhs: Arc<dyn MhsOutboundClient>, status_log: Arc<dyn MigrationStatusLog>) -> Self {
        Self { mhs, status_log }
    }

    /// Builds and sends the continue request for a conversation, then
    /// advances the migration status.
    ///
    /// Returns `true` when the MHS accepted the request and `false` on a
    /// transport error (recorded, not raised).
    ///
    /// # Errors
    ///
    /// Only status-log failures propagate; transport failures are recorded
    /// as transitions.
    pub async fn send_continue_request(&self, data: &ContinueRequestData) -> Result<bool> {
        let message_id = Uuid::new_v4().to_string();
        let payload = build_continue_payload(data, &message_id);
        let request = build_continue_request(
            data.conversation_id.clone(),
            data.to_ods_code.clone(),
            message_id,
            OutboundMessage::new(payload),
        );

        match self.mhs.send(&request).await {
            Ok(()) => {
                tracing::info!(
                    conversation_id = %data.conversation_id,
                    "MHS accepted continue request"
                );
                self.status_log
                    .add_migration_status_log(STATUS_ON_ACCEPT, &data.nhs_number)?;
                Ok(true)
            }
            Err(error) => {
                tracing::error!(
                    conversation_id = %data.conversation_id,
                    %error,
                    "received an error response from MHS"
                );
                self.status_log
                    .add_migration_status_log(STATUS_ON_ERROR, &data.nhs_number)?;
                Ok(false)
            }
        }
    }
}

/// Renders the COPC continue interaction for the conversation: fresh message
/// id, creation time, and the sending/receiving accredited system ids.
fn build_continue_payload(data: &ContinueRequestData, message_id: &str) -> String {
    let creation_time = Utc::now().format("%Y%m%d%H%M%S");

    format!(
        r#"<COPC_IN000001UK01 xmlns="urn:hl7-org:v3">
    <id root="{message_id}" />
    <creationTime value="{creation_time}" />
    <versionCode code="V3NPfIT3.1.10" />
    <interactionId root="2.16.840.1.113883.2.1.3.2.4.12" extension="COPC_IN000001UK01" />
    <processingCode code="P" />
    <processingModeCode code="T" />
    <acceptAckCode code="NE" />
    <communicationFunctionRcv typeCode="RCV">
        <device classCode="DEV" determinerCode="INSTANCE">
            <id root="1.2.826.0.1285.0.2.0.107" extension="{to_asid}" />
        </device>
    </communicationFunctionRcv>
    <communicationFunctionSnd typeCode="SND">
        <device classCode="DEV" determinerCode="INSTANCE">
            <id root="1.2.826.0.1285.0.2.0.107" extension="{from_asid}" />
        </device>
    </communicationFunctionSnd>
    <ControlActEvent classCode="CACT" moodCode="EVN">
        <reason typeCode="RSON" />
    </ControlActEvent>
</COPC_IN000001UK01>"#,
        to_asid = data.to_asid,
        from_asid = data.from_asid,
    )
}
