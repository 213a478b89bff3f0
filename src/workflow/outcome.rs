use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::run::ProvisioningRun;
use super::stage::Stage;
use crate::identity::DeviceIdentity;

/// The stage that stopped a run and what went wrong there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub detail: String,
}

impl std::fmt::Display for StageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.detail)
    }
}

/// The single externally observable result of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningOutcome {
    Success,
    Failure(StageFailure),
}

impl ProvisioningOutcome {
    pub fn failure(stage: Stage, detail: impl Into<String>) -> Self {
        ProvisioningOutcome::Failure(StageFailure {
            stage,
            detail: detail.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProvisioningOutcome::Success)
    }
}

/// Structured record produced when a run reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningReport {
    pub run_id: String,
    pub serial_number: String,
    pub identity: Option<DeviceIdentity>,
    pub completed_stages: Vec<Stage>,
    pub outcome: ProvisioningOutcome,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl ProvisioningReport {
    /// Build the report from a finished run. A run that never reached a
    /// terminal state is reported as failed at its current stage.
    pub fn from_run(run: &ProvisioningRun) -> Self {
        let now = Utc::now();
        let outcome = run.outcome.clone().unwrap_or_else(|| {
            ProvisioningOutcome::failure(run.stage, "run did not reach a terminal state")
        });

        Self {
            run_id: run.id.clone(),
            serial_number: run.serial_number.clone(),
            identity: run.identity.clone(),
            completed_stages: run.completed.clone(),
            outcome,
            started_at: run.created_at,
            completed_at: now,
            duration_ms: (now - run.created_at).num_milliseconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_failure_display() {
        let failure = StageFailure {
            stage: Stage::Registration,
            detail: "service unavailable".into(),
        };
        assert_eq!(failure.to_string(), "REGISTRATION failed: service unavailable");
    }

    #[test]
    fn report_from_unfinished_run_is_failure() {
        let run = ProvisioningRun::new("SN123");
        let report = ProvisioningReport::from_run(&run);

        assert_eq!(report.serial_number, "SN123");
        assert_eq!(report.run_id, run.id);
        assert!(report.completed_stages.is_empty());
        assert!(matches!(
            report.outcome,
            ProvisioningOutcome::Failure(StageFailure {
                stage: Stage::InitialFlash,
                ..
            })
        ));
        assert!(report.duration_ms >= 0);
    }

    #[test]
    fn report_serializes_identity_as_string() {
        let mut run = ProvisioningRun::new("SN123");
        run.identity = Some(DeviceIdentity::new("123456789012345"));
        let json = serde_json::to_value(ProvisioningReport::from_run(&run)).unwrap();
        assert_eq!(json["identity"], "123456789012345");
        assert_eq!(json["serial_number"], "SN123");
    }
}
