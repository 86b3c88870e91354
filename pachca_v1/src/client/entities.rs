//! Wrappers tipados sobre [`PachcaClient::send`] para cada recurso da API

use crate::client::api::PachcaClient;
use crate::error::Result;
use crate::types::{
    Client, Deal, EntityKind, Funnel, Message, NewClient, NewDeal, NewMessage, NewOrganization,
    NewTask, Organization, Property, Task, User,
};

impl PachcaClient {
    /// Lista os funis de venda com suas etapas
    pub async fn funnels(&self) -> Result<Vec<Funnel>> {
        self.get_data("funnels").await
    }

    /// Lista as propriedades customizadas de um tipo de entidade
    pub async fn custom_properties(&self, entity: EntityKind) -> Result<Vec<Property>> {
        self.get_data(&format!("custom_properties?entity_type={}", entity))
            .await
    }

    /// Lista os usuários do espaço de trabalho
    pub async fn users(&self) -> Result<Vec<User>> {
        self.get_data("users").await
    }

    pub async fn create_organization(&self, organization: &NewOrganization) -> Result<Organization> {
        let payload = organization.to_payload()?;
        self.post_data("organizations", &payload).await
    }

    pub async fn create_client(&self, client: &NewClient) -> Result<Client> {
        let payload = client.to_payload()?;
        self.post_data("clients", &payload).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let payload = task.to_payload()?;
        self.post_data("tasks", &payload).await
    }

    pub async fn create_deal(&self, deal: &NewDeal) -> Result<Deal> {
        let payload = deal.to_payload()?;
        self.post_data("deals", &payload).await
    }

    pub async fn create_message(&self, message: &NewMessage) -> Result<Message> {
        let payload = message.to_payload()?;
        self.post_data("messages", &payload).await
    }
}
