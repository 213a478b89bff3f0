//! Request validation and routing by part number.
//!
//! The [`Dispatcher`] takes the query-style parameters a provisioning trigger
//! carries (`serial`, `partnum`) and answers with an HTTP-style [`Response`]:
//! 200 on success, 400 for client errors, 500 for any failed stage.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::identity::{DeviceIdentity, IdentityReader};
use crate::programmer::ImageProgrammer;
use crate::registration::IdentityRegistrar;
use crate::workflow::{
    LteNodeProvisioner, ProvisioningOutcome, ProvisioningReport, Stage, StageFailure,
};

pub const PARAM_SERIAL: &str = "serial";
pub const PARAM_PART_NUMBER: &str = "partnum";

pub const SUCCESS_BODY: &str = "Successfully programmed both images and associated IMEI";

/// Hardware variants this system knows how to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartNumber {
    /// LTE Node, variant 1.
    #[default]
    LteNodeV1,
}

impl PartNumber {
    pub fn as_str(self) -> &'static str {
        match self {
            PartNumber::LteNodeV1 => "L001",
        }
    }
}

impl FromStr for PartNumber {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L001" => Ok(PartNumber::LteNodeV1),
            other => Err(RequestError::UnsupportedPartNumber(other.to_string())),
        }
    }
}

impl std::fmt::Display for PartNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Missing required parameter: serial")]
    MissingSerial,

    #[error("Unsupported part number")]
    UnsupportedPartNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub serial_number: String,
    pub part_number: PartNumber,
}

impl ProvisioningRequest {
    /// Parse the trigger's query parameters. A blank serial counts as missing.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, RequestError> {
        let serial_number = params
            .get(PARAM_SERIAL)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or(RequestError::MissingSerial)?
            .to_string();

        let part_number = match params.get(PARAM_PART_NUMBER) {
            Some(raw) => raw.parse()?,
            None => PartNumber::default(),
        };

        Ok(Self {
            serial_number,
            part_number,
        })
    }
}

/// HTTP-style answer to a provisioning request.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub status_code: u16,
    pub body: String,
    /// Present whenever the provisioning sequence actually ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ProvisioningReport>,
}

impl Response {
    fn bad_request(body: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            body: body.into(),
            report: None,
        }
    }

    /// A failure raised before any stage ran.
    fn rejected(failure: &StageFailure) -> Self {
        let (status_code, body) = describe_failure(failure, "", None);
        Self {
            status_code,
            body,
            report: None,
        }
    }

    fn from_report(report: ProvisioningReport) -> Self {
        let (status_code, body) = match &report.outcome {
            ProvisioningOutcome::Success => (200, SUCCESS_BODY.to_string()),
            ProvisioningOutcome::Failure(failure) => {
                describe_failure(failure, &report.serial_number, report.identity.as_ref())
            }
        };
        Self {
            status_code,
            body,
            report: Some(report),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

fn describe_failure(
    failure: &StageFailure,
    serial: &str,
    identity: Option<&DeviceIdentity>,
) -> (u16, String) {
    let detail = &failure.detail;
    match failure.stage {
        Stage::InitialFlash => (500, format!("Error programming initial image: {detail}")),
        Stage::IdentityRead => (
            500,
            format!("Error reading IMEI for Serial {serial}: {detail}"),
        ),
        Stage::Registration => {
            let imei = identity.map(|id| id.as_str()).unwrap_or("<unknown>");
            (
                500,
                format!("Error associating IMEI {imei} with Serial {serial}: {detail}"),
            )
        }
        Stage::ApplicationFlash => (
            500,
            format!("Error programming production image: {detail}"),
        ),
        Stage::UnsupportedVariant => (400, "Unsupported part number".to_string()),
    }
}

/// Routes provisioning requests to the workflow for their part number.
pub struct Dispatcher<P, I, R> {
    lte_node: LteNodeProvisioner<P, I, R>,
}

impl<P, I, R> Dispatcher<P, I, R>
where
    P: ImageProgrammer,
    I: IdentityReader,
    R: IdentityRegistrar,
{
    pub fn new(lte_node: LteNodeProvisioner<P, I, R>) -> Self {
        Self { lte_node }
    }

    pub async fn handle(&self, params: &HashMap<String, String>) -> Response {
        let request = match ProvisioningRequest::from_query(params) {
            Ok(request) => request,
            Err(RequestError::UnsupportedPartNumber(raw)) => {
                warn!(part_number = %raw, "Rejected unsupported part number");
                return Response::rejected(&StageFailure {
                    stage: Stage::UnsupportedVariant,
                    detail: raw,
                });
            }
            Err(e) => {
                warn!(error = %e, params = ?params, "Rejected provisioning request");
                return Response::bad_request(e.to_string());
            }
        };

        match request.part_number {
            PartNumber::LteNodeV1 => {
                let report = self.lte_node.provision(&request.serial_number).await;
                Response::from_report(report)
            }
        }
    }
}
