use clap::{Args, Parser, Subcommand};
use pachca_v1::{
    ContactValue, CustomProperties, EntityKind, NewClient, NewDeal, NewMessage, NewOrganization,
    NewTask, Note, OneOrMany, PachcaClient, TaskKind,
};
use serde_json::{json, Value};

use crate::config::Settings;
use crate::utils::{AppError, AppResult};

/// Pachca CLI - Interface de linha de comando para a API compartilhada do Pachca
#[derive(Parser, Debug)]
#[command(name = "pachca")]
#[command(version = "0.1.0")]
#[command(about = "CLI para a API do Pachca (CRM e mensagens)", long_about = None)]
pub struct Cli {
    /// Caminho do arquivo de refresh token (sobrepõe PACHCA_REFRESH_FILE)
    #[arg(long, global = true)]
    pub refresh_file: Option<String>,

    /// Código de autorização do redirect OAuth (sobrepõe PACHCA_AUTH_CODE)
    #[arg(long, global = true)]
    pub auth_code: Option<String>,

    /// URL base da API (sobrepõe PACHCA_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Formato de saída (json, pretty)
    #[arg(short = 'o', long, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Modo verbose para debug
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Comando a executar
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Json,
    Pretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            _ => Err(format!("Formato desconhecido: {}", s)),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Obtém um access token e grava o refresh token no refresh store
    Auth,

    /// Mostra o refresh token persistido
    RefreshToken,

    /// Lista funis e etapas
    Funnels,

    /// Lista usuários da empresa
    Users,

    /// Lista propriedades customizadas de uma entidade
    Properties {
        /// Organization, Client ou Deal
        #[arg(short = 'e', long, default_value = "Deal")]
        entity: String,
    },

    /// Cria uma organização
    CreateOrganization(OrganizationArgs),

    /// Cria um cliente
    CreateClient(ClientArgs),

    /// Cria uma tarefa
    CreateTask(TaskArgs),

    /// Cria um negócio
    CreateDeal(DealArgs),

    /// Envia uma mensagem para uma entidade
    CreateMessage(MessageArgs),

    /// Executa um request arbitrário (GET ou POST)
    Request {
        /// Método HTTP
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Caminho relativo à URL base, por exemplo `funnels`
        path: String,

        /// Corpo JSON
        #[arg(short = 'd', long)]
        data: Option<String>,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Auth => "auth",
            Commands::RefreshToken => "refresh-token",
            Commands::Funnels => "funnels",
            Commands::Users => "users",
            Commands::Properties { .. } => "properties",
            Commands::CreateOrganization(_) => "create-organization",
            Commands::CreateClient(_) => "create-client",
            Commands::CreateTask(_) => "create-task",
            Commands::CreateDeal(_) => "create-deal",
            Commands::CreateMessage(_) => "create-message",
            Commands::Request { .. } => "request",
        }
    }
}

#[derive(Args, Debug)]
pub struct OrganizationArgs {
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// INN (identificador fiscal)
    #[arg(long)]
    pub inn: Option<String>,

    /// Propriedade customizada no formato id=valor (repetível)
    #[arg(short = 'p', long = "property")]
    pub properties: Vec<String>,
}

impl OrganizationArgs {
    pub fn to_params(&self) -> AppResult<NewOrganization> {
        let mut params = NewOrganization::new().properties(parse_properties(&self.properties)?);
        if let Some(name) = &self.name {
            params = params.name(name.as_str());
        }
        if let Some(inn) = &self.inn {
            params = params.inn(inn.as_str());
        }
        Ok(params)
    }
}

#[derive(Args, Debug)]
pub struct ClientArgs {
    #[arg(short = 'n', long)]
    pub full_name: String,

    /// Telefone (repetível)
    #[arg(long = "phone")]
    pub phones: Vec<String>,

    /// E-mail (repetível)
    #[arg(long = "email")]
    pub emails: Vec<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub organization_id: Option<i64>,

    #[arg(long)]
    pub additional: Option<String>,

    /// Tag (repetível)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Propriedade customizada no formato id=valor (repetível)
    #[arg(short = 'p', long = "property")]
    pub properties: Vec<String>,
}

impl ClientArgs {
    pub fn to_params(&self) -> AppResult<NewClient> {
        let mut params =
            NewClient::new(self.full_name.as_str()).properties(parse_properties(&self.properties)?);
        if let Some(phones) = contacts(&self.phones) {
            params = params.phones(phones);
        }
        if let Some(emails) = contacts(&self.emails) {
            params = params.emails(emails);
        }
        if let Some(address) = &self.address {
            params = params.address(address.as_str());
        }
        if let Some(id) = self.organization_id {
            params = params.organization_id(id);
        }
        if let Some(additional) = &self.additional {
            params = params.additional(additional.as_str());
        }
        if let Some(tags) = one_or_many(&self.tags) {
            params = params.tags(tags);
        }
        Ok(params)
    }
}

#[derive(Args, Debug)]
pub struct TaskArgs {
    /// call, meeting, reminder, event ou email
    #[arg(short = 'k', long)]
    pub kind: String,

    #[arg(short = 'c', long)]
    pub content: Option<String>,

    /// Vencimento (ISO-8601)
    #[arg(long)]
    pub due_at: Option<String>,

    #[arg(short = 'p', long, default_value_t = 1)]
    pub priority: i64,

    /// ID do responsável (repetível)
    #[arg(long = "performer")]
    pub performer_ids: Vec<i64>,
}

impl TaskArgs {
    pub fn to_params(&self) -> AppResult<NewTask> {
        let kind: TaskKind = self.kind.parse()?;
        let mut params = NewTask::new(kind).priority(self.priority);
        if let Some(content) = &self.content {
            params = params.content(content.as_str());
        }
        if let Some(due_at) = &self.due_at {
            params = params.due_at(due_at.as_str());
        }
        if !self.performer_ids.is_empty() {
            params = params.performer_ids(OneOrMany::Many(self.performer_ids.clone()));
        }
        Ok(params)
    }
}

#[derive(Args, Debug)]
pub struct DealArgs {
    #[arg(short = 'n', long)]
    pub name: String,

    #[arg(long)]
    pub client_id: i64,

    #[arg(long)]
    pub stage_id: i64,

    #[arg(long)]
    pub cost: Option<i64>,

    /// Propriedade customizada no formato id=valor (repetível)
    #[arg(short = 'p', long = "property")]
    pub properties: Vec<String>,

    /// Nota: texto simples ou objeto JSON
    #[arg(long)]
    pub note: Option<String>,
}

impl DealArgs {
    pub fn to_params(&self) -> AppResult<NewDeal> {
        let mut params = NewDeal::new(self.name.as_str(), self.client_id, self.stage_id)
            .properties(parse_properties(&self.properties)?);
        if let Some(cost) = self.cost {
            params = params.cost(cost);
        }
        if let Some(note) = &self.note {
            params = params.note(parse_note(note)?);
        }
        Ok(params)
    }
}

#[derive(Args, Debug)]
pub struct MessageArgs {
    #[arg(long)]
    pub entity_id: i64,

    #[arg(short = 'c', long)]
    pub content: String,

    #[arg(long, default_value = "Deal")]
    pub entity_type: String,
}

impl MessageArgs {
    pub fn to_params(&self) -> NewMessage {
        NewMessage::new(self.entity_id, self.content.as_str()).entity_type(self.entity_type.as_str())
    }
}

/// Estrutura para resposta padronizada
#[derive(serde::Serialize, Debug)]
pub struct CliResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl CliResponse {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg),
        }
    }
}

impl Cli {
    /// Aplica as flags globais sobre as configurações carregadas
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(path) = &self.refresh_file {
            settings.refresh_file = Some(path.clone());
        }
        if let Some(code) = &self.auth_code {
            settings.auth_code = Some(code.clone());
        }
        if let Some(url) = &self.api_url {
            settings.api_base_url = Some(url.clone());
        }
    }
}

pub async fn execute_command(command: &Commands, settings: &Settings) -> AppResult<CliResponse> {
    let config = settings.to_pachca_config()?;
    let refresh_store = config.refresh_store.display().to_string();

    let client = PachcaClient::new(config)?;

    let data = match command {
        Commands::Auth => {
            client.refresh_access_token().await?;
            json!({
                "message": "Autenticação concluída com sucesso!",
                "refresh_store": refresh_store,
            })
        }
        Commands::RefreshToken => {
            let token = client.authority().get_refresh_token().await?;
            json!({
                "refresh_store": refresh_store,
                "refresh_token": token.secret(),
            })
        }
        Commands::Funnels => serde_json::to_value(client.funnels().await?)?,
        Commands::Users => serde_json::to_value(client.users().await?)?,
        Commands::Properties { entity } => {
            let entity: EntityKind = entity.parse()?;
            serde_json::to_value(client.custom_properties(entity).await?)?
        }
        Commands::CreateOrganization(args) => {
            serde_json::to_value(client.create_organization(&args.to_params()?).await?)?
        }
        Commands::CreateClient(args) => {
            serde_json::to_value(client.create_client(&args.to_params()?).await?)?
        }
        Commands::CreateTask(args) => {
            serde_json::to_value(client.create_task(&args.to_params()?).await?)?
        }
        Commands::CreateDeal(args) => {
            serde_json::to_value(client.create_deal(&args.to_params()?).await?)?
        }
        Commands::CreateMessage(args) => {
            serde_json::to_value(client.create_message(&args.to_params()).await?)?
        }
        Commands::Request { method, path, data } => {
            let body = data.as_deref().map(serde_json::from_str::<Value>).transpose()?;
            let response = client.request(method, path, body.as_ref()).await?;
            response
                .json::<Value>()
                .unwrap_or_else(|_| Value::String(response.body().to_string()))
        }
    };

    Ok(CliResponse::success(data))
}

pub fn output_response(response: &CliResponse, format: &OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(response) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("❌ Erro: {}", e),
        },
        OutputFormat::Pretty => {
            if response.success {
                if let Some(data) = &response.data {
                    println!("✅ Sucesso!");
                    match serde_json::to_string_pretty(data) {
                        Ok(text) => println!("{}", text),
                        Err(e) => eprintln!("❌ Erro: {}", e),
                    }
                }
            } else if let Some(error) = &response.error {
                eprintln!("❌ Erro: {}", error);
            }
        }
    }
}

/// Converte `id=valor` em propriedades; o valor é lido como JSON quando possível
pub fn parse_properties(raw: &[String]) -> AppResult<CustomProperties> {
    let mut properties = CustomProperties::new();
    for entry in raw {
        let (id, value) = entry.split_once('=').ok_or_else(|| {
            AppError::ValidationError(format!("Formato inválido: {}. Use id=valor", entry))
        })?;
        let value = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        properties.insert(id.trim(), value);
    }
    Ok(properties)
}

/// Texto que começa com `{` é lido como objeto JSON; o resto vira nota de texto
pub fn parse_note(raw: &str) -> AppResult<Note> {
    if raw.trim_start().starts_with('{') {
        let value: Value = serde_json::from_str(raw)?;
        return Ok(Note::from_value(value)?);
    }
    Ok(Note::from(raw))
}

fn one_or_many(values: &[String]) -> Option<OneOrMany<String>> {
    match values {
        [] => None,
        [single] => Some(OneOrMany::One(single.clone())),
        many => Some(OneOrMany::Many(many.to_vec())),
    }
}

fn contacts(values: &[String]) -> Option<OneOrMany<ContactValue>> {
    one_or_many(values).map(|list| match list {
        OneOrMany::One(value) => OneOrMany::One(ContactValue::Text(value)),
        many => OneOrMany::Many(many.into_vec().into_iter().map(ContactValue::Text).collect()),
    })
}
