use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use pachca_v1::PachcaConfig;
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

/// Configuração da CLI, em camadas: `config/default`, `config/{RUN_MODE}` e variáveis `PACHCA_*`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub refresh_file: Option<String>,
    pub auth_code: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("PACHCA"))
            .build()?;

        s.try_deserialize()
    }

    /// Converte para a configuração do SDK, exigindo as três credenciais
    pub fn to_pachca_config(&self) -> Result<PachcaConfig, AppError> {
        let mut config = PachcaConfig::new(
            required(&self.client_id, "client_id")?,
            required(&self.client_secret, "client_secret")?,
            required(&self.redirect_uri, "redirect_uri")?,
        )?;

        if let Some(path) = &self.refresh_file {
            config = config.refresh_store(path);
        }
        if let Some(code) = self.auth_code.as_deref().filter(|c| !c.is_empty()) {
            config = config.authorization_code(code);
        }
        if let Some(url) = &self.api_base_url {
            config = config.api_base_url(url.as_str());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            AppError::ConfigError(format!(
                "{} is not configured (set PACHCA_{} or config/default)",
                key,
                key.to_uppercase()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CREDENTIALS: [(&str, Option<&str>); 3] = [
        ("PACHCA_CLIENT_ID", Some("id")),
        ("PACHCA_CLIENT_SECRET", Some("secret")),
        ("PACHCA_REDIRECT_URI", Some("https://example.com/callback")),
    ];

    #[test]
    fn test_settings_from_env() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("PACHCA_REFRESH_FILE", Some("/tmp/pachca_refresh")));
        vars.push(("PACHCA_TIMEOUT_SECS", Some("12")));

        temp_env::with_vars(vars, || {
            let settings = Settings::new().unwrap();
            assert_eq!(settings.client_id.as_deref(), Some("id"));
            assert_eq!(settings.timeout_secs, Some(12));

            let config = settings.to_pachca_config().unwrap();
            assert_eq!(config.refresh_store, std::path::PathBuf::from("/tmp/pachca_refresh"));
            assert_eq!(config.timeout, Duration::from_secs(12));
            assert!(config.authorization_code.is_none());
        });
    }

    #[test]
    fn test_missing_credentials() {
        let settings = Settings {
            client_id: Some("id".to_string()),
            ..Settings::default()
        };

        match settings.to_pachca_config() {
            Err(AppError::ConfigError(message)) => assert!(message.contains("client_secret")),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_redirect_uri() {
        let settings = Settings {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            redirect_uri: Some("ftp://example.com".to_string()),
            ..Settings::default()
        };

        assert!(matches!(
            settings.to_pachca_config(),
            Err(AppError::Pachca(pachca_v1::PachcaError::Configuration(_)))
        ));
    }
}
