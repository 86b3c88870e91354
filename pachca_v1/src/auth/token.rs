use std::fmt;
use std::path::{Path, PathBuf};

use oauth2::RefreshToken;
use serde::{Deserialize, Serialize};

use crate::error::{PachcaError, Result};

/// Tipo de grant OAuth2 suportado pelo endpoint de token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corpo JSON enviado para `POST oauth/token`
#[derive(Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: GrantType,
    pub redirect_uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
}

/// Resposta 2xx do endpoint de token
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Resposta 4xx do endpoint de token
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenErrorResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}

/// Arquivo de texto puro que guarda o refresh token atual.
///
/// O conteúdo inteiro do arquivo é o token; cada troca bem-sucedida sobrescreve o valor
/// anterior. Não há lock entre processos: dois processos apontando para o mesmo arquivo
/// podem ler um token que o outro já substituiu.
#[derive(Debug, Clone)]
pub struct RefreshStore {
    path: PathBuf,
}

impl RefreshStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(false)` só quando o arquivo não existe; qualquer outra falha de I/O é `Storage`
    pub async fn exists(&self) -> Result<bool> {
        tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| PachcaError::storage(&self.path, e))
    }

    /// Lê o refresh token armazenado. Uma quebra de linha final é ignorada.
    pub async fn load(&self) -> Result<RefreshToken> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| PachcaError::storage(&self.path, e))?;

        Ok(RefreshToken::new(
            contents.trim_end_matches(['\r', '\n']).to_string(),
        ))
    }

    /// Substitui o conteúdo do arquivo pelo novo refresh token
    pub async fn save(&self, token: &RefreshToken) -> Result<()> {
        tokio::fs::write(&self.path, token.secret())
            .await
            .map_err(|e| PachcaError::storage(&self.path, e))?;

        tracing::debug!("Refresh token persisted to {}", self.path.display());
        Ok(())
    }
}
