use std::fmt;

use pachca_v1::PachcaError;

#[derive(Debug)]
pub enum AppError {
    Pachca(PachcaError),
    ConfigError(String),
    JsonError(serde_json::Error),
    ValidationError(String),
}

impl AppError {
    /// Código de saída do processo para este erro
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ConfigError(_) => 78,
            AppError::Pachca(PachcaError::Configuration(_)) => 78,
            AppError::ValidationError(_) | AppError::Pachca(PachcaError::InvalidValue(_)) => 65,
            _ => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Pachca(err) => write!(f, "Pachca error: {}", err),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Pachca(err) => Some(err),
            AppError::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PachcaError> for AppError {
    fn from(err: PachcaError) -> Self {
        AppError::Pachca(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
