#![allow(dead_code)]

use std::path::Path;

use pachca_v1::PachcaConfig;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const REDIRECT_URI: &str = "https://example.com/callback";

pub fn config(server: &MockServer, dir: &Path) -> PachcaConfig {
    PachcaConfig::new(CLIENT_ID, CLIENT_SECRET, REDIRECT_URI)
        .unwrap()
        .api_base_url(server.uri())
        .refresh_store(dir.join("refresh_token"))
}

pub fn token_body(access_token: &str, refresh_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "token_type": "bearer"
    }))
}

/// Mock do endpoint de token para um grant específico
pub fn token_grant(grant_type: &str, response: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({ "grant_type": grant_type })))
        .respond_with(response)
}

pub fn data(payload: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": payload }))
}
