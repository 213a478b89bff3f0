use std::fmt;

use serde::{Deserialize, Serialize};

use super::outcome::ProvisioningOutcome;
use super::run::{ProvisioningRun, RunStatus};

/// Stages of the LTE Node provisioning sequence.
///
/// A run flows through: INITIAL_FLASH → IDENTITY_READ → REGISTRATION →
/// APPLICATION_FLASH. `UnsupportedVariant` is never executed; it only
/// attributes a failure raised before the sequence starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    InitialFlash,
    IdentityRead,
    Registration,
    ApplicationFlash,
    UnsupportedVariant,
}

impl Stage {
    /// The executable stages in order.
    pub const SEQUENCE: [Stage; 4] = [
        Stage::InitialFlash,
        Stage::IdentityRead,
        Stage::Registration,
        Stage::ApplicationFlash,
    ];

    /// The stage that follows this one, or `None` after the last.
    pub fn next(self) -> Option<Stage> {
        let pos = Self::SEQUENCE.iter().position(|s| *s == self)?;
        Self::SEQUENCE.get(pos + 1).copied()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::InitialFlash => write!(f, "INITIAL_FLASH"),
            Stage::IdentityRead => write!(f, "IDENTITY_READ"),
            Stage::Registration => write!(f, "REGISTRATION"),
            Stage::ApplicationFlash => write!(f, "APPLICATION_FLASH"),
            Stage::UnsupportedVariant => write!(f, "UNSUPPORTED_VARIANT"),
        }
    }
}

/// Result of executing the current stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Failed(String),
}

/// The result of evaluating a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Advance to the next stage.
    Next(Stage),
    /// The run is over, successfully or at the first failed stage.
    Complete(ProvisioningOutcome),
}

/// Drives a `ProvisioningRun` forward. There is no retry transition: the
/// first failure ends the run, attributed to the stage that was executing.
pub struct StateMachine;

impl StateMachine {
    pub fn next(run: &mut ProvisioningRun, outcome: StepOutcome) -> Transition {
        if run.is_terminal()
            && let Some(done) = &run.outcome
        {
            return Transition::Complete(done.clone());
        }

        let transition = match outcome {
            StepOutcome::Done => match run.stage.next() {
                Some(next) => Transition::Next(next),
                None => Transition::Complete(ProvisioningOutcome::Success),
            },
            StepOutcome::Failed(detail) => {
                Transition::Complete(ProvisioningOutcome::failure(run.stage, detail))
            }
        };

        match &transition {
            Transition::Next(next_stage) => {
                run.completed.push(run.stage);
                run.stage = *next_stage;
                run.status = RunStatus::InProgress;
            }
            Transition::Complete(outcome) => {
                if outcome.is_success() {
                    run.completed.push(run.stage);
                    run.status = RunStatus::Completed;
                } else {
                    run.status = RunStatus::Failed;
                }
                run.outcome = Some(outcome.clone());
            }
        }

        transition
    }
}
