use std::path::PathBuf;
use thiserror::Error;

/// Erros do cliente Pachca
#[derive(Error, Debug)]
pub enum PachcaError {
    /// Nenhuma credencial utilizável (sem refresh token em disco e sem código de autorização),
    /// ou configuração inválida
    #[error("Configuração inválida: {0}")]
    Configuration(String),

    /// Resposta 4xx do endpoint de token
    #[error("Erro OAuth {error}: {description}")]
    Auth { error: String, description: String },

    /// Resposta 4xx/5xx de um endpoint de recurso (corpo bruto preservado)
    #[error("Erro de API do Pachca (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Status inesperado do endpoint de token (5xx, 1xx, 3xx)
    #[error("Resposta inesperada do endpoint de token (status {status}): {body}")]
    Transport { status: u16, body: String },

    /// Falha de rede ou de leitura da resposta
    #[error("Erro de rede: {0}")]
    Http(#[from] reqwest::Error),

    /// Refresh store ilegível ou não gravável
    #[error("Refresh store {} inacessível: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Valor inválido fornecido pelo chamador, detectado antes de qualquer I/O
    #[error("Valor inválido: {0}")]
    InvalidValue(String),

    /// Payload de sucesso que não corresponde ao formato esperado
    #[error("Erro de parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PachcaError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Status HTTP associado ao erro, quando houver
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Transport { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// `true` para um 401 vindo de um endpoint de recurso
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Falhas de transporte: status inesperado do endpoint de token ou erro de rede
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Http(_))
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, PachcaError>;
