//! Migration status progression
//!
//! The continuation protocol driver advances a per-conversation migration
//! status. Transitions are recorded through the append-only status log
//! collaborator; the core only writes forward transitions and never reads
//! prior state.

use serde::{Deserialize, Serialize};

/// Status of a patient migration
///
/// Progression is linear with a fork at the continuation step:
/// `RequestReceived` → `ExtractReceived` → `ExtractProcessing` →
/// (`ContinueRequestAccepted` | `ContinueRequestError`) →
/// (`MigrationCompleted` | `MigrationFailed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationStatus {
    RequestReceived,
    ExtractReceived,
    ExtractProcessing,
    ContinueRequestAccepted,
    ContinueRequestError,
    MigrationCompleted,
    MigrationFailed,
}

impl MigrationStatus {
    /// True when no further transitions are expected
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MigrationStatus::MigrationCompleted | MigrationStatus::MigrationFailed
        )
    }
}

impl std::fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MigrationStatus::RequestReceived => "REQUEST_RECEIVED",
            MigrationStatus::ExtractReceived => "EXTRACT_RECEIVED",
            MigrationStatus::ExtractProcessing => "EXTRACT_PROCESSING",
            MigrationStatus::ContinueRequestAccepted => "CONTINUE_REQUEST_ACCEPTED",
            MigrationStatus::ContinueRequestError => "CONTINUE_REQUEST_ERROR",
            MigrationStatus::MigrationCompleted => "MIGRATION_COMPLETED",
            MigrationStatus::MigrationFailed => "MIGRATION_FAILED",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde_form() {
        let json = serde_json::to_string(&MigrationStatus::ContinueRequestAccepted).unwrap();
        assert_eq!(json, "\"CONTINUE_REQUEST_ACCEPTED\"");
        assert_eq!(
            MigrationStatus::ContinueRequestAccepted.to_string(),
            "CONTINUE_REQUEST_ACCEPTED"
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(MigrationStatus::MigrationCompleted.is_terminal());
        assert!(MigrationStatus::MigrationFailed.is_terminal());
        assert!(!MigrationStatus::ContinueRequestError.is_terminal());
    }
}
