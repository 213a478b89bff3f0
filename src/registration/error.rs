//! Tipos de erro para o cliente de registro.
//!
//! [`RegistrationError`] distingue uma rejeição do backend (qualquer status
//! diferente de 200, com o corpo preservado) de uma falha de transporte.

use std::error::Error as _;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistrationError {
    /// O backend respondeu com status diferente de 200.
    /// `body` é o texto da resposta, sem alteração.
    #[error("backend rejected registration (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RegistrationError {
    /// Texto de diagnóstico repassado ao chamador: o corpo da resposta do
    /// backend quando houver, senão a descrição do erro de transporte seguida
    /// de cada causa da cadeia `source()` (ex.: "Connection refused").
    pub fn detail(&self) -> String {
        match self {
            RegistrationError::Rejected { body, .. } => body.clone(),
            RegistrationError::Transport(e) => {
                let mut detail = e.to_string();
                let mut cause = e.source();
                while let Some(err) = cause {
                    let text = err.to_string();
                    if !detail.contains(&text) {
                        detail.push_str(": ");
                        detail.push_str(&text);
                    }
                    cause = err.source();
                }
                detail
            }
        }
    }
}
