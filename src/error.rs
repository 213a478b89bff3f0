use thiserror::Error;

use crate::registration::RegistrationError;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Registration client error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML render error: {0}")]
    TomlRender(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ProvisionError::Config("init_image must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Config error: init_image must not be empty"
        );
    }

    #[test]
    fn toml_error_converts() {
        let parse = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: ProvisionError = parse.into();
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}
