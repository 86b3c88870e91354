//! # Pachca v1 Rust Crate
//!
//! Cliente para a API compartilhada do Pachca (CRM e mensagens).
//!
//! ## Features
//!
//! - Autenticação OAuth2 com refresh token persistido em arquivo
//! - Reautenticação automática (uma única vez) quando a API responde 401
//! - Wrappers tipados para funis, usuários, propriedades, organizações, clientes,
//!   tarefas, negócios e mensagens
//!
//! ## Exemplo
//!
//! ```no_run
//! use pachca_v1::{NewClient, PachcaClient, PachcaConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PachcaConfig::new("client_id", "client_secret", "https://example.com/callback")?
//!         .refresh_store(".refresh_token")
//!         .authorization_code("code-from-consent-redirect");
//!
//!     let client = PachcaClient::connect(config).await?;
//!     for funnel in client.funnels().await? {
//!         println!("{} ({} stages)", funnel.name, funnel.stages.len());
//!     }
//!
//!     let created = client.create_client(&NewClient::new("Ivan Petrov").phones(79990000000_i64)).await?;
//!     println!("client #{}", created.id);
//!     Ok(())
//! }
//! ```

/// Módulo de autenticação OAuth2
pub mod auth;

/// Módulo de cliente API
pub mod client;

/// Módulo de configuração
pub mod config;

/// Módulo de tratamento de erros
pub mod error;

/// Parâmetros e registros da API
pub mod types;

// Re-exportações para conveniência
pub use auth::{RefreshStore, TokenAuthority};
pub use client::{ApiMethod, ApiResponse, PachcaClient};
pub use config::PachcaConfig;
pub use error::{PachcaError, Result};
pub use types::*;
