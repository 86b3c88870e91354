use std::fmt;
use std::str::FromStr;

use oauth2::AccessToken;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::auth::TokenAuthority;
use crate::config::PachcaConfig;
use crate::error::{PachcaError, Result};

/// Métodos HTTP aceitos pela API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
}

impl FromStr for ApiMethod {
    type Err = PachcaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(ApiMethod::Get),
            "POST" => Ok(ApiMethod::Post),
            _ => Err(PachcaError::invalid_value(format!(
                "método deve ser GET ou POST, recebido {}",
                s
            ))),
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMethod::Get => f.write_str("GET"),
            ApiMethod::Post => f.write_str("POST"),
        }
    }
}

/// Resposta 2xx de um endpoint de recurso
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Desserializa o corpo inteiro
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Desserializa o conteúdo da chave `data`, que envolve todos os payloads de sucesso
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        let envelope: DataEnvelope<T> = serde_json::from_str(&self.body)?;
        Ok(envelope.data)
    }
}

/// Cliente HTTP para a API do Pachca.
///
/// Guarda um único access token em memória. Quando o servidor responde 401, o cliente
/// pede um token novo ao [`TokenAuthority`] e repete a chamada exatamente uma vez; a
/// resposta da repetição é devolvida como está, mesmo que seja outro 401.
///
/// O token fica atrás de um mutex assíncrono: tarefas concorrentes que recebem 401 com o
/// mesmo token obsoleto fazem uma única renovação.
#[derive(Debug)]
pub struct PachcaClient {
    http_client: Client,
    base_url: String,
    authority: TokenAuthority,
    access_token: Mutex<Option<AccessToken>>,
}

impl PachcaClient {
    /// Cria o cliente sem obter token; o primeiro request faz a autenticação
    pub fn new(config: PachcaConfig) -> Result<Self> {
        let http_client = config.http_client()?;
        let authority = TokenAuthority::with_http_client(&config, http_client.clone());

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            authority,
            access_token: Mutex::new(None),
        })
    }

    /// Cria o cliente e obtém imediatamente um access token
    pub async fn connect(config: PachcaConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.current_token().await?;
        Ok(client)
    }

    pub fn authority(&self) -> &TokenAuthority {
        &self.authority
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Substitui o access token em cache
    pub async fn set_access_token(&self, token: AccessToken) {
        *self.access_token.lock().await = Some(token);
    }

    /// Descarta o token em cache e obtém um novo
    pub async fn refresh_access_token(&self) -> Result<AccessToken> {
        let mut cached = self.access_token.lock().await;
        let token = self.authority.get_access_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Executa um request autenticado. `method` precisa ser `GET` ou `POST`; qualquer
    /// outro valor, ou um corpo enviado com `GET`, falha com [`PachcaError::InvalidValue`]
    /// antes de qualquer I/O.
    pub async fn request(&self, method: &str, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let method = method.parse::<ApiMethod>()?;
        self.send(method, path, body).await
    }

    /// Versão tipada de [`PachcaClient::request`]
    pub async fn send(&self, method: ApiMethod, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        if method == ApiMethod::Get && body.is_some() {
            return Err(PachcaError::invalid_value("requests GET não aceitam corpo"));
        }
        let url = self.build_url(path);

        let token = self.current_token().await?;
        let (mut status, mut text) = self.execute(method, &url, body, &token).await?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("{} {} returned 401, re-authenticating once", method, url);
            let fresh = self.reauthenticate(&token).await?;
            (status, text) = self.execute(method, &url, body, &fresh).await?;
        }

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body: text,
            })
        } else {
            tracing::warn!("Pachca API error ({}) on {} {}", status.as_u16(), method, url);
            Err(PachcaError::Api {
                status: status.as_u16(),
                body: text,
            })
        }
    }

    /// GET seguido da desserialização de `data`
    pub(crate) async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiMethod::Get, path, None).await?.data()
    }

    /// POST seguido da desserialização de `data`
    pub(crate) async fn post_data<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        self.send(ApiMethod::Post, path, Some(body)).await?.data()
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn current_token(&self) -> Result<AccessToken> {
        let mut cached = self.access_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.authority.get_access_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn reauthenticate(&self, stale: &AccessToken) -> Result<AccessToken> {
        let mut cached = self.access_token.lock().await;

        // Outra tarefa já trocou o token enquanto esta esperava o lock
        if let Some(current) = cached.as_ref() {
            if current.secret() != stale.secret() {
                return Ok(current.clone());
            }
        }

        let token = self.authority.get_access_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn execute(
        &self,
        method: ApiMethod,
        url: &str,
        body: Option<&Value>,
        token: &AccessToken,
    ) -> Result<(StatusCode, String)> {
        tracing::debug!("{} {}", method, url);

        let mut request = match method {
            ApiMethod::Get => self.http_client.get(url),
            ApiMethod::Post => self.http_client.post(url),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.bearer_auth(token.secret()).send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!("Response status: {}", status);
        Ok((status, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("GET".parse::<ApiMethod>().unwrap(), ApiMethod::Get);
        assert_eq!("post".parse::<ApiMethod>().unwrap(), ApiMethod::Post);

        for method in ["PUT", "DELETE", "PATCH", ""] {
            assert!(matches!(
                method.parse::<ApiMethod>(),
                Err(PachcaError::InvalidValue(_))
            ));
        }
    }

    #[test]
    fn test_url_building() {
        let config = PachcaConfig::new("client", "secret", "https://example.com/cb")
            .unwrap()
            .api_base_url("http://localhost:1234/api/shared/v1/");
        let client = PachcaClient::new(config).unwrap();

        assert_eq!(client.base_url(), "http://localhost:1234/api/shared/v1");
        assert_eq!(client.build_url("funnels"), "http://localhost:1234/api/shared/v1/funnels");
        assert_eq!(client.build_url("/users"), "http://localhost:1234/api/shared/v1/users");
    }

    #[test]
    fn test_response_data_envelope() {
        let response = ApiResponse {
            status: 200,
            body: r#"{"data":[1,2,3],"meta":{}}"#.to_string(),
        };
        let data: Vec<i64> = response.data().unwrap();
        assert_eq!(data, vec![1, 2, 3]);

        let whole: Value = response.json().unwrap();
        assert!(whole.get("meta").is_some());
    }

    #[test]
    fn test_response_without_data_is_json_error() {
        let response = ApiResponse {
            status: 200,
            body: r#"{"items":[]}"#.to_string(),
        };
        assert!(matches!(response.data::<Vec<i64>>(), Err(PachcaError::Json(_))));
    }
}
