use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use oauth2::{AuthorizationCode, ClientId, ClientSecret, RedirectUrl};

use crate::error::{PachcaError, Result};

/// URL base da API compartilhada do Pachca
pub const DEFAULT_API_BASE_URL: &str = "https://api.pachca.com/api/shared/v1";

/// Caminho padrão do refresh store
pub const DEFAULT_REFRESH_FILE: &str = ".refresh_token";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuração do cliente: credenciais OAuth2, endpoints e localização do refresh store.
///
/// As credenciais são imutáveis após a construção e nunca são persistidas; apenas o
/// refresh token vai para disco (ver [`crate::auth::RefreshStore`]).
#[derive(Debug, Clone)]
pub struct PachcaConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub redirect_uri: RedirectUrl,
    pub refresh_store: PathBuf,
    pub authorization_code: Option<AuthorizationCode>,
    pub api_base_url: String,
    /// Timeout total por requisição HTTP
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl PachcaConfig {
    /// Cria uma configuração com os valores padrão para tudo além das credenciais
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Result<Self> {
        let redirect_uri = redirect_uri.into();
        let redirect_uri = RedirectUrl::new(redirect_uri.clone()).map_err(|e| {
            PachcaError::configuration(format!("redirect URI inválida {}: {}", redirect_uri, e))
        })?;

        let config = Self {
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
            redirect_uri,
            refresh_store: PathBuf::from(DEFAULT_REFRESH_FILE),
            authorization_code: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Carrega a configuração das variáveis `PACHCA_*` (e de um `.env`, se existir)
    pub fn from_env() -> Result<Self> {
        // Durante testes, as variáveis são configuradas diretamente
        if cfg!(not(test)) && Path::new(".env").exists() {
            dotenvy::dotenv()
                .map_err(|e| PachcaError::configuration(format!("falha ao carregar .env: {}", e)))?;
        }

        let mut config = Self::new(
            Self::get_env_var("PACHCA_CLIENT_ID")?,
            Self::get_env_var("PACHCA_CLIENT_SECRET")?,
            Self::get_env_var("PACHCA_REDIRECT_URI")?,
        )?;

        if let Some(path) = Self::get_optional_var("PACHCA_REFRESH_FILE") {
            config = config.refresh_store(path);
        }
        if let Some(code) = Self::get_optional_var("PACHCA_AUTH_CODE") {
            config = config.authorization_code(code);
        }
        if let Some(url) = Self::get_optional_var("PACHCA_API_BASE_URL") {
            config = config.api_base_url(url);
        }
        if let Some(secs) = Self::get_optional_var("PACHCA_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                PachcaError::configuration(format!("PACHCA_TIMEOUT_SECS deve ser um inteiro, recebido {}", secs))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    fn get_env_var(key: &str) -> Result<String> {
        env::var(key).map_err(|_| PachcaError::configuration(format!("{} não definida", key)))
    }

    fn get_optional_var(key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    pub fn refresh_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.refresh_store = path.into();
        self
    }

    /// Código de autorização obtido fora de banda (redirect de consentimento OAuth)
    pub fn authorization_code(mut self, code: impl Into<String>) -> Self {
        self.authorization_code = Some(AuthorizationCode::new(code.into()));
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Valida se todas as configurações obrigatórias estão presentes
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(PachcaError::configuration("client_id é obrigatório"));
        }
        if self.client_secret.secret().is_empty() {
            return Err(PachcaError::configuration("client_secret é obrigatório"));
        }
        if !self.redirect_uri.starts_with("http://") && !self.redirect_uri.starts_with("https://") {
            return Err(PachcaError::configuration(
                "redirect_uri deve ser uma URL http(s)",
            ));
        }
        Ok(())
    }

    /// URL completa de um endpoint relativo à API
    pub fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Endpoint de token OAuth2
    pub fn token_url(&self) -> String {
        self.api_url("oauth/token")
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| PachcaError::configuration(format!("falha ao criar cliente HTTP: {}", e)))
    }
}
