use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use super::error::RegistrationError;
use super::types::RegistrationRequest;
use crate::identity::DeviceIdentity;

/// Registers a device identity against its serial number in inventory.
pub trait IdentityRegistrar {
    async fn register(
        &self,
        serial_number: &str,
        identity: &DeviceIdentity,
    ) -> Result<(), RegistrationError>;
}

impl<T: IdentityRegistrar> IdentityRegistrar for &T {
    async fn register(
        &self,
        serial_number: &str,
        identity: &DeviceIdentity,
    ) -> Result<(), RegistrationError> {
        (**self).register(serial_number, identity).await
    }
}

/// HTTP client for the inventory backend's IMEI association endpoint.
///
/// One attempt per call. Retrying is left to the operator on the line.
pub struct RegistrationClient {
    client: Client,
    url: String,
}

impl RegistrationClient {
    pub fn new(url: String, request_timeout: Duration) -> Result<Self, RegistrationError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl IdentityRegistrar for RegistrationClient {
    async fn register(
        &self,
        serial_number: &str,
        identity: &DeviceIdentity,
    ) -> Result<(), RegistrationError> {
        let req = RegistrationRequest {
            serial_number: serial_number.to_string(),
            imei: identity.as_str().to_string(),
        };
        debug!(url = %self.url, serial = %serial_number, "Posting IMEI registration");

        let response = self.client.post(&self.url).json(&req).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable response body: {e}>"));
            return Err(RegistrationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
