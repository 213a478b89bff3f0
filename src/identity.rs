//! Device identity (IMEI) acquisition.
//!
//! [`IdentityReader`] is the seam for talking to the modem once the initial
//! image is running. The only implementation today is
//! [`PlaceholderIdentityReader`], which hands back a configured value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hardware identity read from a device. Never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("device returned an unreadable identity: {0:?}")]
    Malformed(String),
}

/// IMEIs are 15 decimal digits.
pub fn is_valid_imei(value: &str) -> bool {
    value.len() == 15 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Obtains the identity of the device with the given serial number.
pub trait IdentityReader {
    async fn read_identity(&self, serial_number: &str) -> Result<DeviceIdentity, IdentityError>;
}

impl<T: IdentityReader> IdentityReader for &T {
    async fn read_identity(&self, serial_number: &str) -> Result<DeviceIdentity, IdentityError> {
        (**self).read_identity(serial_number).await
    }
}

/// Returns the same configured IMEI for every device.
// TODO: query the modem with AT+CGSN once the initial image exposes its UART.
pub struct PlaceholderIdentityReader {
    imei: String,
}

impl PlaceholderIdentityReader {
    pub fn new(imei: String) -> Self {
        Self { imei }
    }
}

impl IdentityReader for PlaceholderIdentityReader {
    async fn read_identity(&self, _serial_number: &str) -> Result<DeviceIdentity, IdentityError> {
        if !is_valid_imei(&self.imei) {
            return Err(IdentityError::Malformed(self.imei.clone()));
        }
        Ok(DeviceIdentity::new(self.imei.clone()))
    }
}
