//! Corpo da requisição enviada ao backend de inventário.

use serde::{Deserialize, Serialize};

/// Payload do `POST` que associa o IMEI ao número de série.
///
/// O backend espera a identidade no campo `imei`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub serial_number: String,
    pub imei: String,
}
