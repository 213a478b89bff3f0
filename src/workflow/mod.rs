mod outcome;
mod provisioner;
mod run;
mod stage;

#[cfg(test)]
pub(crate) mod fakes;

pub use outcome::{ProvisioningOutcome, ProvisioningReport, StageFailure};
pub use provisioner::LteNodeProvisioner;
pub use stage::Stage;
