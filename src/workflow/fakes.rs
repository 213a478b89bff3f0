//! In-memory stand-ins for the workflow collaborators, with call recording.

use std::sync::Mutex;

use crate::identity::{DeviceIdentity, IdentityError, IdentityReader};
use crate::programmer::error::ProgramError;
use crate::programmer::types::ProgramOutput;
use crate::programmer::{ImageProgrammer, ImageSpec};
use crate::registration::{IdentityRegistrar, RegistrationError};

pub const TEST_IMEI: &str = "123456789012345";

/// Records every image it is asked to flash; fails on `fail_on`.
#[derive(Default)]
pub struct FakeProgrammer {
    fail_on: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProgrammer {
    pub fn failing_on(image: &str) -> Self {
        Self {
            fail_on: Some(image.to_string()),
            ..Default::default()
        }
    }

    pub fn flashed(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ImageProgrammer for FakeProgrammer {
    async fn program(&self, image: &ImageSpec) -> Result<ProgramOutput, ProgramError> {
        self.calls.lock().unwrap().push(image.name().to_string());
        if self.fail_on.as_deref() == Some(image.name()) {
            return Err(ProgramError::Failed {
                code: Some(1),
                status: "exit status: 1".into(),
                output: "ERROR: Could not connect to target".into(),
            });
        }
        Ok(ProgramOutput {
            output: format!("Wrote {}", image.name()),
        })
    }
}

/// Returns a fixed identity, or a malformed-identity error.
pub struct FakeReader {
    identity: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeReader {
    pub fn returning(identity: &str) -> Self {
        Self {
            identity: Some(identity.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            identity: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl IdentityReader for FakeReader {
    async fn read_identity(&self, serial_number: &str) -> Result<DeviceIdentity, IdentityError> {
        self.calls.lock().unwrap().push(serial_number.to_string());
        match &self.identity {
            Some(value) => Ok(DeviceIdentity::new(value.clone())),
            None => Err(IdentityError::Malformed("+CME ERROR: 10".into())),
        }
    }
}

/// Accepts every registration, or rejects with a status and body.
#[derive(Default)]
pub struct FakeRegistrar {
    reject: Option<(u16, String)>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeRegistrar {
    pub fn rejecting(status: u16, body: &str) -> Self {
        Self {
            reject: Some((status, body.to_string())),
            ..Default::default()
        }
    }

    pub fn registered(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl IdentityRegistrar for FakeRegistrar {
    async fn register(
        &self,
        serial_number: &str,
        identity: &DeviceIdentity,
    ) -> Result<(), RegistrationError> {
        self.calls
            .lock()
            .unwrap()
            .push((serial_number.to_string(), identity.as_str().to_string()));
        match &self.reject {
            Some((status, body)) => Err(RegistrationError::Rejected {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}
