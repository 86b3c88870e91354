//! Registros retornados pela API (conteúdo da chave `data`)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Etapa de um funil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: i64,
    pub name: String,
    /// A API às vezes envia a ordenação como texto
    #[serde(deserialize_with = "int_or_string")]
    pub sort: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funnel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

/// Propriedade customizada (definição, ou valor quando vem dentro de uma entidade)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub suspended: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: Option<String>,
    pub inn: Option<String>,
    #[serde(rename = "custom_properties", default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub client_number: Option<i64>,
    pub owner_id: Option<i64>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub phones: Vec<Value>,
    #[serde(default)]
    pub emails: Vec<Value>,
    pub organization_id: Option<i64>,
    pub additional: Option<String>,
    #[serde(default)]
    pub list_tags: Vec<String>,
    #[serde(rename = "custom_properties", default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub kind: String,
    pub content: Option<String>,
    pub due_at: Option<String>,
    pub priority: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub performer_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: i64,
    pub owner_id: Option<i64>,
    pub created_at: Option<String>,
    pub name: String,
    pub client_id: Option<i64>,
    /// Algumas versões da API enviam o cliente nesta chave (id ou objeto)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Value>,
    pub stage_id: Option<i64>,
    pub cost: Option<i64>,
    pub state: Option<String>,
    #[serde(rename = "custom_properties", default)]
    pub properties: Vec<Property>,
}

impl Deal {
    /// Id do cliente, venha ele em `client_id` ou em `client`
    pub fn client_ref(&self) -> Option<i64> {
        self.client_id.or_else(|| {
            self.client.as_ref().and_then(|client| {
                client
                    .as_i64()
                    .or_else(|| client.get("id").and_then(Value::as_i64))
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub entity: Option<Value>,
    pub content: String,
    pub user_id: Option<i64>,
    pub created_at: Option<String>,
}

fn int_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Text(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(value) => Ok(value),
        IntOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
