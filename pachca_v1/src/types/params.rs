//! Parâmetros de entrada dos wrappers de entidade.
//!
//! Os tipos união da API (escalar-ou-lista, texto-ou-objeto, propriedades com chave
//! livre) são normalizados aqui, antes de montar o payload: listas saem sempre como
//! array JSON, notas sempre como objeto e chaves de propriedade sempre como inteiro.

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::{PachcaError, Result};

/// Um valor ou uma lista de valores; serializa sempre como lista
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Serialize> Serialize for OneOrMany<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            OneOrMany::One(value) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(value)?;
                seq.end()
            }
            OneOrMany::Many(values) => values.serialize(serializer),
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<i64> for OneOrMany<i64> {
    fn from(value: i64) -> Self {
        OneOrMany::One(value)
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Telefone ou e-mail de um cliente: a API aceita número ou texto
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContactValue {
    Number(i64),
    Text(String),
}

impl From<i64> for ContactValue {
    fn from(value: i64) -> Self {
        ContactValue::Number(value)
    }
}

impl From<&str> for ContactValue {
    fn from(value: &str) -> Self {
        ContactValue::Text(value.to_string())
    }
}

impl From<String> for ContactValue {
    fn from(value: String) -> Self {
        ContactValue::Text(value)
    }
}

impl From<ContactValue> for OneOrMany<ContactValue> {
    fn from(value: ContactValue) -> Self {
        OneOrMany::One(value)
    }
}

impl From<i64> for OneOrMany<ContactValue> {
    fn from(value: i64) -> Self {
        OneOrMany::One(value.into())
    }
}

impl From<&str> for OneOrMany<ContactValue> {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.into())
    }
}

impl From<String> for OneOrMany<ContactValue> {
    fn from(value: String) -> Self {
        OneOrMany::One(value.into())
    }
}

impl From<Vec<i64>> for OneOrMany<ContactValue> {
    fn from(values: Vec<i64>) -> Self {
        OneOrMany::Many(values.into_iter().map(ContactValue::from).collect())
    }
}

impl From<Vec<&str>> for OneOrMany<ContactValue> {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(ContactValue::from).collect())
    }
}

impl From<Vec<String>> for OneOrMany<ContactValue> {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values.into_iter().map(ContactValue::from).collect())
    }
}

/// Nota de um negócio: texto simples ou objeto completo (`content`, `files`, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum Note {
    Text(String),
    Object(Map<String, Value>),
}

impl Note {
    /// Aceita uma string ou um objeto JSON
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Note::Text(text)),
            Value::Object(object) => Ok(Note::Object(object)),
            other => Err(PachcaError::invalid_value(format!(
                "nota deve ser texto ou objeto, recebido {}",
                other
            ))),
        }
    }

    /// Texto vazio ou objeto sem chaves
    pub fn is_empty(&self) -> bool {
        match self {
            Note::Text(text) => text.is_empty(),
            Note::Object(object) => object.is_empty(),
        }
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Note::Text(content) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("content", content)?;
                map.end()
            }
            Note::Object(object) => object.serialize(serializer),
        }
    }
}

impl From<&str> for Note {
    fn from(value: &str) -> Self {
        Note::Text(value.to_string())
    }
}

impl From<String> for Note {
    fn from(value: String) -> Self {
        Note::Text(value)
    }
}

impl From<Map<String, Value>> for Note {
    fn from(value: Map<String, Value>) -> Self {
        Note::Object(value)
    }
}

/// Valor de propriedade customizada no formato da API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomPropertyValue {
    pub id: i64,
    pub value: Value,
}

/// Mapa ordenado `id da propriedade → valor`.
///
/// As chaves chegam como texto (por exemplo, vindas da linha de comando) e são
/// convertidas para inteiro em [`CustomProperties::to_wire`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomProperties {
    entries: Vec<(String, Value)>,
}

impl CustomProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define o valor de uma propriedade; uma chave repetida mantém a posição original
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converte para `[{id, value}]`, falhando se alguma chave não for inteira
    pub fn to_wire(&self) -> Result<Vec<CustomPropertyValue>> {
        self.entries
            .iter()
            .map(|(key, value)| {
                let id = key.trim().parse::<i64>().map_err(|_| {
                    PachcaError::invalid_value(format!(
                        "chave de propriedade customizada deve ser um id inteiro, recebido {:?}",
                        key
                    ))
                })?;
                Ok(CustomPropertyValue {
                    id,
                    value: value.clone(),
                })
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CustomProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = CustomProperties::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

/// Entidades que aceitam propriedades customizadas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Organization,
    Client,
    Deal,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Organization => "Organization",
            EntityKind::Client => "Client",
            EntityKind::Deal => "Deal",
        }
    }
}

impl FromStr for EntityKind {
    type Err = PachcaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Organization" => Ok(EntityKind::Organization),
            "Client" => Ok(EntityKind::Client),
            "Deal" => Ok(EntityKind::Deal),
            _ => Err(PachcaError::invalid_value(format!(
                "entidade deve ser 'Organization', 'Client' ou 'Deal', recebido {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de tarefa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Call,
    Meeting,
    Reminder,
    Event,
    Email,
}

impl FromStr for TaskKind {
    type Err = PachcaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "call" => Ok(TaskKind::Call),
            "meeting" => Ok(TaskKind::Meeting),
            "reminder" => Ok(TaskKind::Reminder),
            "event" => Ok(TaskKind::Event),
            "email" => Ok(TaskKind::Email),
            _ => Err(PachcaError::invalid_value(format!(
                "tipo de tarefa deve ser call, meeting, reminder, event ou email, recebido {:?}",
                s
            ))),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn insert_list<T: Serialize>(data: &mut Map<String, Value>, key: &str, values: &Option<OneOrMany<T>>) -> Result<()> {
    if let Some(values) = values.as_ref().filter(|v| !v.is_empty()) {
        data.insert(key.to_string(), serde_json::to_value(values)?);
    }
    Ok(())
}

fn insert_properties(data: &mut Map<String, Value>, properties: &CustomProperties) -> Result<()> {
    if !properties.is_empty() {
        data.insert(
            "custom_properties".to_string(),
            serde_json::to_value(properties.to_wire()?)?,
        );
    }
    Ok(())
}

/// Payload de `POST organizations`. Exige `name` ou `inn`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewOrganization {
    pub name: Option<String>,
    pub inn: Option<String>,
    pub custom_properties: CustomProperties,
}

impl NewOrganization {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn inn(mut self, inn: impl Into<String>) -> Self {
        self.inn = Some(inn.into());
        self
    }

    pub fn property(mut self, id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_properties.insert(id, value);
        self
    }

    pub fn properties(mut self, properties: CustomProperties) -> Self {
        self.custom_properties = properties;
        self
    }

    /// Monta `{"organization": {...}}`
    pub fn to_payload(&self) -> Result<Value> {
        let name = non_empty(&self.name);
        let inn = non_empty(&self.inn);
        if name.is_none() && inn.is_none() {
            return Err(PachcaError::invalid_value(
                "organização precisa de ao menos um identificador (name, inn)",
            ));
        }

        let mut data = Map::new();
        if let Some(name) = name {
            data.insert("name".to_string(), json!(name));
        }
        if let Some(inn) = inn {
            data.insert("inn".to_string(), json!(inn));
        }
        insert_properties(&mut data, &self.custom_properties)?;

        Ok(json!({ "organization": data }))
    }
}

/// Payload de `POST clients`
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub full_name: String,
    pub phones: Option<OneOrMany<ContactValue>>,
    pub emails: Option<OneOrMany<ContactValue>>,
    pub address: Option<String>,
    pub organization_id: Option<i64>,
    pub additional: Option<String>,
    pub tags: Option<OneOrMany<String>>,
    pub custom_properties: CustomProperties,
}

impl NewClient {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            phones: None,
            emails: None,
            address: None,
            organization_id: None,
            additional: None,
            tags: None,
            custom_properties: CustomProperties::new(),
        }
    }

    pub fn phones(mut self, phones: impl Into<OneOrMany<ContactValue>>) -> Self {
        self.phones = Some(phones.into());
        self
    }

    pub fn emails(mut self, emails: impl Into<OneOrMany<ContactValue>>) -> Self {
        self.emails = Some(emails.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn organization_id(mut self, id: i64) -> Self {
        self.organization_id = Some(id);
        self
    }

    pub fn additional(mut self, additional: impl Into<String>) -> Self {
        self.additional = Some(additional.into());
        self
    }

    pub fn tags(mut self, tags: impl Into<OneOrMany<String>>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn property(mut self, id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_properties.insert(id, value);
        self
    }

    pub fn properties(mut self, properties: CustomProperties) -> Self {
        self.custom_properties = properties;
        self
    }

    /// Monta `{"client": {...}}`
    pub fn to_payload(&self) -> Result<Value> {
        let mut data = Map::new();
        data.insert("full_name".to_string(), json!(self.full_name));
        insert_list(&mut data, "phones", &self.phones)?;
        insert_list(&mut data, "emails", &self.emails)?;
        if let Some(address) = non_empty(&self.address) {
            data.insert("address".to_string(), json!(address));
        }
        if let Some(organization_id) = self.organization_id.filter(|id| *id != 0) {
            data.insert("organization_id".to_string(), json!(organization_id));
        }
        if let Some(additional) = non_empty(&self.additional) {
            data.insert("additional".to_string(), json!(additional));
        }
        insert_list(&mut data, "list_tags", &self.tags)?;
        insert_properties(&mut data, &self.custom_properties)?;

        Ok(json!({ "client": data }))
    }
}

/// Payload de `POST tasks`. A prioridade padrão é 1.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub kind: TaskKind,
    pub content: Option<String>,
    /// Data de vencimento: texto ISO-8601 ou timestamp
    pub due_at: Option<Value>,
    pub priority: i64,
    pub performer_ids: Option<OneOrMany<i64>>,
}

impl NewTask {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            content: None,
            due_at: None,
            priority: 1,
            performer_ids: None,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn due_at(mut self, due_at: impl Into<Value>) -> Self {
        self.due_at = Some(due_at.into());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn performer_ids(mut self, ids: impl Into<OneOrMany<i64>>) -> Self {
        self.performer_ids = Some(ids.into());
        self
    }

    /// Monta `{"task": {...}}`
    pub fn to_payload(&self) -> Result<Value> {
        let mut data = Map::new();
        data.insert("kind".to_string(), serde_json::to_value(self.kind)?);
        data.insert("priority".to_string(), json!(self.priority));
        if let Some(content) = non_empty(&self.content) {
            data.insert("content".to_string(), json!(content));
        }
        if let Some(due_at) = self.due_at.as_ref().filter(|v| !v.is_null()) {
            data.insert("due_at".to_string(), due_at.clone());
        }
        insert_list(&mut data, "performer_ids", &self.performer_ids)?;

        Ok(json!({ "task": data }))
    }
}

/// Payload de `POST deals`
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeal {
    pub name: String,
    pub client_id: i64,
    pub stage_id: i64,
    pub cost: Option<i64>,
    pub custom_properties: CustomProperties,
    pub note: Option<Note>,
}

impl NewDeal {
    pub fn new(name: impl Into<String>, client_id: i64, stage_id: i64) -> Self {
        Self {
            name: name.into(),
            client_id,
            stage_id,
            cost: None,
            custom_properties: CustomProperties::new(),
            note: None,
        }
    }

    pub fn cost(mut self, cost: i64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn property(mut self, id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_properties.insert(id, value);
        self
    }

    pub fn properties(mut self, properties: CustomProperties) -> Self {
        self.custom_properties = properties;
        self
    }

    pub fn note(mut self, note: impl Into<Note>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Monta `{"deal": {...}}`
    pub fn to_payload(&self) -> Result<Value> {
        let mut data = Map::new();
        data.insert("name".to_string(), json!(self.name));
        data.insert("client_id".to_string(), json!(self.client_id));
        data.insert("stage_id".to_string(), json!(self.stage_id));
        if let Some(cost) = self.cost.filter(|c| *c != 0) {
            data.insert("cost".to_string(), json!(cost));
        }
        insert_properties(&mut data, &self.custom_properties)?;
        if let Some(note) = self.note.as_ref().filter(|n| !n.is_empty()) {
            data.insert("note".to_string(), serde_json::to_value(note)?);
        }

        Ok(json!({ "deal": data }))
    }
}

/// Payload de `POST messages`. O tipo de entidade padrão é `Deal`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub entity_id: i64,
    pub content: String,
    pub entity_type: String,
}

impl NewMessage {
    pub fn new(entity_id: i64, content: impl Into<String>) -> Self {
        Self {
            entity_id,
            content: content.into(),
            entity_type: EntityKind::Deal.as_str().to_string(),
        }
    }

    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = entity_type.into();
        self
    }

    /// Monta `{"message": {...}}`
    pub fn to_payload(&self) -> Result<Value> {
        Ok(json!({
            "message": {
                "entity_type": self.entity_type,
                "entity_id": self.entity_id,
                "content": self.content,
            }
        }))
    }
}
