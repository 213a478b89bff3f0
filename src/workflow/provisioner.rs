use tracing::{debug, info, warn};

use super::outcome::ProvisioningReport;
use super::run::{ProvisioningRun, RunStatus};
use super::stage::{Stage, StateMachine, StepOutcome, Transition};
use crate::identity::IdentityReader;
use crate::programmer::{ImageProgrammer, ImageSet, ImageSpec};
use crate::registration::IdentityRegistrar;

/// Runs the LTE Node sequence: flash the initial image, read the IMEI,
/// register it against the serial, flash the application image.
///
/// Each stage is awaited before the next one starts and the first failure
/// ends the run. Nothing is retried or rolled back; a half-provisioned
/// device is left as-is for the operator.
pub struct LteNodeProvisioner<P, I, R> {
    programmer: P,
    identity_reader: I,
    registrar: R,
    images: ImageSet,
}

impl<P, I, R> LteNodeProvisioner<P, I, R>
where
    P: ImageProgrammer,
    I: IdentityReader,
    R: IdentityRegistrar,
{
    pub fn new(programmer: P, identity_reader: I, registrar: R, images: ImageSet) -> Self {
        Self {
            programmer,
            identity_reader,
            registrar,
            images,
        }
    }

    /// Provision the device with the given serial number.
    pub async fn provision(&self, serial_number: &str) -> ProvisioningReport {
        let mut run = ProvisioningRun::new(serial_number);
        run.status = RunStatus::InProgress;
        info!(run_id = %run.id, serial = %serial_number, "Provisioning started");

        loop {
            let stage = run.stage;
            info!(run_id = %run.id, stage = %stage, "Stage started");
            let outcome = self.execute_stage(&mut run).await;

            if let StepOutcome::Failed(detail) = &outcome {
                warn!(run_id = %run.id, stage = %stage, detail = %detail, "Stage failed");
            } else {
                info!(run_id = %run.id, stage = %stage, "Stage completed");
            }

            match StateMachine::next(&mut run, outcome) {
                Transition::Next(_) => continue,
                Transition::Complete(_) => break,
            }
        }

        let report = ProvisioningReport::from_run(&run);
        info!(
            run_id = %report.run_id,
            serial = %report.serial_number,
            success = report.outcome.is_success(),
            duration_ms = report.duration_ms,
            "Provisioning finished"
        );
        report
    }

    async fn execute_stage(&self, run: &mut ProvisioningRun) -> StepOutcome {
        match run.stage {
            Stage::InitialFlash => self.flash(&self.images.initial).await,
            Stage::IdentityRead => {
                let read = self.identity_reader.read_identity(&run.serial_number).await;
                match read {
                    Ok(identity) if identity.is_blank() => {
                        StepOutcome::Failed("device reported an empty identity".into())
                    }
                    Ok(identity) => {
                        debug!(run_id = %run.id, imei = %identity, "Identity read");
                        run.identity = Some(identity);
                        StepOutcome::Done
                    }
                    Err(e) => StepOutcome::Failed(e.to_string()),
                }
            }
            Stage::Registration => {
                let Some(identity) = run.identity.as_ref() else {
                    return StepOutcome::Failed("no identity available to register".into());
                };
                match self.registrar.register(&run.serial_number, identity).await {
                    Ok(()) => StepOutcome::Done,
                    Err(e) => StepOutcome::Failed(e.detail()),
                }
            }
            Stage::ApplicationFlash => self.flash(&self.images.application).await,
            Stage::UnsupportedVariant => {
                StepOutcome::Failed("unsupported variant is not an executable stage".into())
            }
        }
    }

    async fn flash(&self, image: &ImageSpec) -> StepOutcome {
        match self.programmer.program(image).await {
            Ok(out) => {
                debug!(image = %image, output = %out.output, "Flashing tool output");
                StepOutcome::Done
            }
            Err(e) => StepOutcome::Failed(e.to_string()),
        }
    }
}
