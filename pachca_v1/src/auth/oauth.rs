use oauth2::{AccessToken, AuthorizationCode, ClientId, ClientSecret, RedirectUrl, RefreshToken};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::auth::token::{GrantType, RefreshStore, TokenErrorResponse, TokenRequest, TokenResponse};
use crate::config::PachcaConfig;
use crate::error::{PachcaError, Result};

/// Dono do refresh store: obtém access tokens pelo grant OAuth2 válido no momento e
/// persiste o refresh token resultante.
///
/// Política de grant, avaliada a cada chamada de [`TokenAuthority::get_access_token`]:
/// 1. refresh store existe → grant `refresh_token` com o token armazenado;
/// 2. senão, código de autorização disponível → grant `authorization_code`;
/// 3. senão → [`PachcaError::Configuration`], sem nenhuma chamada de rede.
#[derive(Debug)]
pub struct TokenAuthority {
    http_client: Client,
    token_url: String,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_uri: RedirectUrl,
    store: RefreshStore,
    // Consumido após o primeiro grant authorization_code bem-sucedido
    authorization_code: Mutex<Option<AuthorizationCode>>,
}

impl TokenAuthority {
    pub fn new(config: &PachcaConfig) -> Result<Self> {
        Ok(Self::with_http_client(config, config.http_client()?))
    }

    /// Cria a autoridade reaproveitando um `reqwest::Client` existente
    pub fn with_http_client(config: &PachcaConfig, http_client: Client) -> Self {
        Self {
            http_client,
            token_url: config.token_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            store: RefreshStore::new(config.refresh_store.clone()),
            authorization_code: Mutex::new(config.authorization_code.clone()),
        }
    }

    pub fn refresh_store(&self) -> &RefreshStore {
        &self.store
    }

    /// Produz um novo access token, executando o grant adequado
    pub async fn get_access_token(&self) -> Result<AccessToken> {
        if self.store.exists().await? {
            tracing::debug!("Refresh store found at {}, using refresh_token grant", self.store.path().display());
            let refresh_token = self.store.load().await?;
            return self
                .request_token(GrantType::RefreshToken, refresh_token.secret())
                .await;
        }

        let mut code = self.authorization_code.lock().await;
        match code.as_ref() {
            Some(auth_code) => {
                tracing::debug!("No refresh store, using authorization_code grant");
                let token = self
                    .request_token(GrantType::AuthorizationCode, auth_code.secret())
                    .await?;
                *code = None;
                Ok(token)
            }
            None => Err(PachcaError::configuration(format!(
                "nenhum refresh token em disco ({}) e nenhum código de autorização fornecido",
                self.store.path().display()
            ))),
        }
    }

    /// Lê o refresh token atualmente persistido
    pub async fn get_refresh_token(&self) -> Result<RefreshToken> {
        self.store.load().await
    }

    /// `true` enquanto ainda houver um código de autorização não consumido
    pub async fn has_authorization_code(&self) -> bool {
        self.authorization_code.lock().await.is_some()
    }

    async fn request_token(&self, grant_type: GrantType, credential: &str) -> Result<AccessToken> {
        let (code, refresh_token) = match grant_type {
            GrantType::AuthorizationCode => (Some(credential), None),
            GrantType::RefreshToken => (None, Some(credential)),
        };
        let body = TokenRequest {
            client_id: self.client_id.as_str(),
            client_secret: self.client_secret.secret(),
            grant_type,
            redirect_uri: self.redirect_uri.as_str(),
            code,
            refresh_token,
        };

        tracing::debug!("POST {} (grant_type={})", self.token_url, grant_type);

        let response = self.http_client.post(&self.token_url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let tokens: TokenResponse = serde_json::from_str(&text)?;
            let refresh_token = RefreshToken::new(tokens.refresh_token);
            self.store.save(&refresh_token).await?;

            tracing::info!("Access token obtained via {} grant", grant_type);
            Ok(AccessToken::new(tokens.access_token))
        } else if status.is_client_error() {
            let reason: TokenErrorResponse =
                serde_json::from_str(&text).unwrap_or_else(|_| TokenErrorResponse {
                    error: status.to_string(),
                    error_description: text.clone(),
                });
            tracing::warn!("Token endpoint rejected {} grant: {} {}", grant_type, status, reason.error);
            Err(PachcaError::Auth {
                error: reason.error,
                description: reason.error_description,
            })
        } else {
            Err(PachcaError::Transport {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> PachcaConfig {
        PachcaConfig::new("client", "secret", "https://example.com/callback")
            .unwrap()
            .api_base_url("http://127.0.0.1:9")
            .refresh_store(dir.join("refresh"))
    }

    #[tokio::test]
    async fn test_no_credentials_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let authority = TokenAuthority::new(&config(dir.path())).unwrap();

        let result = authority.get_access_token().await;
        match result {
            Err(PachcaError::Configuration(message)) => {
                assert!(message.contains("nenhum código de autorização"));
            }
            other => panic!("unexpected result: {:?}", other.map(|t| t.secret().clone())),
        }
    }

    #[tokio::test]
    async fn test_get_refresh_token_without_store() {
        let dir = tempfile::tempdir().unwrap();
        let authority = TokenAuthority::new(&config(dir.path())).unwrap();

        assert!(matches!(
            authority.get_refresh_token().await,
            Err(PachcaError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn test_has_authorization_code() {
        let dir = tempfile::tempdir().unwrap();
        let authority = TokenAuthority::new(&config(dir.path()).authorization_code("c")).unwrap();
        assert!(authority.has_authorization_code().await);

        let authority = TokenAuthority::new(&config(dir.path())).unwrap();
        assert!(!authority.has_authorization_code().await);
    }
}
