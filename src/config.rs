//! Configuração do provisionador carregada a partir de `lte-provision.toml`.
//!
//! A struct [`ProvisionConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis `LTE_PROVISION_REGISTRATION_URL` e `LTE_PROVISION_COMMANDER_PATH`
//! têm precedência sobre o arquivo.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ProvisionError;
use crate::programmer::{ImageSet, ImageSpec};

/// Nome do arquivo de configuração procurado no diretório atual.
pub const DEFAULT_CONFIG_FILE: &str = "lte-provision.toml";

const ENV_REGISTRATION_URL: &str = "LTE_PROVISION_REGISTRATION_URL";
const ENV_COMMANDER_PATH: &str = "LTE_PROVISION_COMMANDER_PATH";

/// Configuração de nível superior carregada de `lte-provision.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Caminho do executável `commander` usado para gravar as imagens.
    #[serde(default = "default_commander_path")]
    pub commander_path: PathBuf,

    /// Imagem inicial (habilita o provisionamento do IMEI).
    #[serde(default = "default_init_image")]
    pub init_image: String,

    /// Imagem de aplicação (firmware de produção).
    #[serde(default = "default_app_image")]
    pub app_image: String,

    /// Endpoint do backend que associa IMEI e número de série.
    #[serde(default = "default_registration_url")]
    pub registration_url: String,

    /// Tempo máximo de uma gravação antes de ser tratada como falha.
    #[serde(default = "default_program_timeout_secs")]
    pub program_timeout_secs: u64,

    /// Timeout total da chamada de registro.
    #[serde(default = "default_registration_timeout_secs")]
    pub registration_timeout_secs: u64,

    /// IMEI devolvido pelo leitor de identidade provisório.
    #[serde(default = "default_placeholder_imei")]
    pub placeholder_imei: String,
}

// `<tmp>/commander/commander`, onde o pacote de deploy descompacta a ferramenta.
fn default_commander_path() -> PathBuf {
    std::env::temp_dir().join("commander").join("commander")
}

fn default_init_image() -> String {
    "LTE_Node_Init.hex".to_string()
}

fn default_app_image() -> String {
    "LTE_Node_App.hex".to_string()
}

fn default_registration_url() -> String {
    "https://waites-server/fetch-imei".to_string()
}

// Gravações de imagem podem levar alguns minutos em hardware lento.
fn default_program_timeout_secs() -> u64 {
    300
}

fn default_registration_timeout_secs() -> u64 {
    30
}

fn default_placeholder_imei() -> String {
    "123456789012345".to_string()
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            commander_path: default_commander_path(),
            init_image: default_init_image(),
            app_image: default_app_image(),
            registration_url: default_registration_url(),
            program_timeout_secs: default_program_timeout_secs(),
            registration_timeout_secs: default_registration_timeout_secs(),
            placeholder_imei: default_placeholder_imei(),
        }
    }
}

impl ProvisionConfig {
    /// Carrega a configuração do caminho fornecido, ou de `lte-provision.toml`
    /// no diretório atual. Usa valores padrão se o arquivo não existir.
    pub fn load(path: Option<&Path>) -> Result<Self, ProvisionError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<ProvisionConfig>(&contents)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Aplica as variáveis de ambiente sobre os valores do arquivo.
    /// Valores vazios são ignorados.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_REGISTRATION_URL)
            && !url.is_empty()
        {
            self.registration_url = url;
        }
        if let Some(path) = lookup(ENV_COMMANDER_PATH)
            && !path.is_empty()
        {
            self.commander_path = PathBuf::from(path);
        }
    }

    /// Rejeita valores que tornariam uma execução impossível.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        if self.init_image.trim().is_empty() {
            return Err(ProvisionError::Config("init_image must not be empty".into()));
        }
        if self.app_image.trim().is_empty() {
            return Err(ProvisionError::Config("app_image must not be empty".into()));
        }
        if self.registration_url.trim().is_empty() {
            return Err(ProvisionError::Config(
                "registration_url must not be empty".into(),
            ));
        }
        if self.program_timeout_secs == 0 {
            return Err(ProvisionError::Config(
                "program_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.registration_timeout_secs == 0 {
            return Err(ProvisionError::Config(
                "registration_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn images(&self) -> ImageSet {
        ImageSet {
            initial: ImageSpec::new(self.init_image.clone()),
            application: ImageSpec::new(self.app_image.clone()),
        }
    }

    pub fn program_timeout(&self) -> Duration {
        Duration::from_secs(self.program_timeout_secs)
    }

    pub fn registration_timeout(&self) -> Duration {
        Duration::from_secs(self.registration_timeout_secs)
    }

    /// Renderiza a configuração efetiva como TOML (subcomando `config`).
    pub fn to_toml(&self) -> Result<String, ProvisionError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ProvisionConfig::default();
        assert_eq!(config.init_image, "LTE_Node_Init.hex");
        assert_eq!(config.app_image, "LTE_Node_App.hex");
        assert_eq!(config.registration_url, "https://waites-server/fetch-imei");
        assert_eq!(config.program_timeout_secs, 300);
        assert_eq!(config.registration_timeout_secs, 30);
        assert_eq!(config.placeholder_imei, "123456789012345");
        assert!(config.commander_path.ends_with("commander/commander"));
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            registration_url = "http://localhost:8080/fetch-imei"
            program_timeout_secs = 60
        "#;
        let config: ProvisionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.registration_url, "http://localhost:8080/fetch-imei");
        assert_eq!(config.program_timeout(), Duration::from_secs(60));
        assert_eq!(config.init_image, "LTE_Node_Init.hex");
        assert_eq!(config.registration_timeout_secs, 30);
    }

    #[test]
    fn load_reads_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("line3.toml");
        std::fs::write(
            &path,
            "commander_path = \"/opt/simplicity/commander\"\napp_image = \"LTE_Node_App_v2.hex\"\n",
        )
        .unwrap();

        let config = ProvisionConfig::load(Some(&path)).unwrap();
        assert_eq!(config.app_image, "LTE_Node_App_v2.hex");
        assert_eq!(config.images().application.name(), "LTE_Node_App_v2.hex");
        assert_eq!(config.images().initial.name(), "LTE_Node_Init.hex");
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = ProvisionConfig::load(Some(&tmp.path().join("missing.toml"))).unwrap();
        assert_eq!(config.program_timeout_secs, 300);
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.toml");
        std::fs::write(&path, "program_timeout_secs = \"soon\"").unwrap();

        let err = ProvisionConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ProvisionError::Toml(_)));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LTE_PROVISION_REGISTRATION_URL", "http://inventory.local/imei"),
            ("LTE_PROVISION_COMMANDER_PATH", "/usr/local/bin/commander"),
        ]);
        let mut config = ProvisionConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.registration_url, "http://inventory.local/imei");
        assert_eq!(
            config.commander_path,
            PathBuf::from("/usr/local/bin/commander")
        );
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let mut config = ProvisionConfig::default();
        config.apply_env_overrides(|_| Some(String::new()));
        assert_eq!(config.registration_url, "https://waites-server/fetch-imei");
    }

    #[test]
    fn validate_rejects_blank_image() {
        let config = ProvisionConfig {
            init_image: "  ".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Config error: init_image must not be empty");
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = ProvisionConfig {
            program_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ProvisionError::Config(_))));
    }

    #[test]
    fn to_toml_renders_effective_values() {
        let rendered = ProvisionConfig::default().to_toml().unwrap();
        assert!(rendered.contains("init_image = \"LTE_Node_Init.hex\""));
        assert!(rendered.contains("program_timeout_secs = 300"));
    }
}
