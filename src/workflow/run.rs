use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::outcome::ProvisioningOutcome;
use super::stage::Stage;
use crate::identity::DeviceIdentity;

/// Tracks the lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// One provisioning attempt for one physical device.
///
/// Re-provisioning the same serial creates a fresh run that repeats every
/// stage; nothing is carried over from earlier attempts.
#[derive(Debug, Clone)]
pub struct ProvisioningRun {
    pub id: String,
    pub serial_number: String,
    pub status: RunStatus,
    pub stage: Stage,
    /// Stages that finished successfully, in order.
    pub completed: Vec<Stage>,
    pub identity: Option<DeviceIdentity>,
    pub outcome: Option<ProvisioningOutcome>,
    pub created_at: DateTime<Utc>,
}

impl ProvisioningRun {
    pub fn new(serial_number: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            serial_number: serial_number.into(),
            status: RunStatus::Pending,
            stage: Stage::InitialFlash,
            completed: Vec::new(),
            identity: None,
            outcome: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, RunStatus::Completed | RunStatus::Failed)
    }
}
