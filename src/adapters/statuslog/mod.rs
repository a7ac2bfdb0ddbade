//! Migration status log collaborator boundary
//!
//! Append-only: the core writes forward transitions and never reads prior
//! state. The durable log lives outside the core; [`TracingStatusLog`]
//! surfaces transitions in the structured log, and [`InMemoryStatusLog`]
//! records them for tests and dry runs.

use std::sync::Mutex;

use crate::domain::result::Result;
use crate::domain::status::MigrationStatus;

/// Append-only migration status log
pub trait MigrationStatusLog: Send + Sync {
    /// Records a forward status transition for a migration key
    /// (NHS number or conversation id).
    fn add_migration_status_log(&self, status: MigrationStatus, migration_key: &str)
        -> Result<()>;
}

/// Status log writing transitions to the structured log
#[derive(Debug, Default)]
pub struct TracingStatusLog;

impl MigrationStatusLog for TracingStatusLog {
    fn add_migration_status_log(
        &self,
        status: MigrationStatus,
        migration_key: &str,
    ) -> Result<()> {
        tracing::info!(%status, migration_key, "migration status transition");
        Ok(())
    }
}

/// Status log keeping transitions in memory
#[derive(Debug, Default)]
pub struct InMemoryStatusLog {
    entries: Mutex<Vec<(MigrationStatus, String)>>,
}

impl InMemoryStatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded transitions, in append order
    pub fn entries(&self) -> Vec<(MigrationStatus, String)> {
        self.entries.lock().expect("status log poisoned").clone()
    }
}

impl MigrationStatusLog for InMemoryStatusLog {
    fn add_migration_status_log(
        &self,
        status: MigrationStatus,
        migration_key: &str,
    ) -> Result<()> {
        self.entries
            .lock()
            .expect("status log poisoned")
            .push((status, migration_key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_log_appends_in_order() {
        let log = InMemoryStatusLog::new();
        log.add_migration_status_log(MigrationStatus::RequestReceived, "9690937286")
            .unwrap();
        log.add_migration_status_log(MigrationStatus::ContinueRequestAccepted, "9690937286")
            .unwrap();

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, MigrationStatus::RequestReceived);
        assert_eq!(entries[1].0, MigrationStatus::ContinueRequestAccepted);
    }

    #[test]
    fn test_tracing_log_accepts_transitions() {
        let log = TracingStatusLog;
        assert!(log
            .add_migration_status_log(MigrationStatus::MigrationCompleted, "conv-1")
            .is_ok());
    }
}
