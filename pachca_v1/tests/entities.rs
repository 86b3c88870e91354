mod common;

use common::*;
use pachca_v1::{
    CustomProperties, EntityKind, NewClient, NewDeal, NewMessage, NewOrganization, NewTask, Note,
    PachcaClient, PachcaError, TaskKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer};

async fn client(server: &MockServer, dir: &std::path::Path) -> PachcaClient {
    token_grant("authorization_code", token_body("access", "refresh"))
        .expect(1)
        .mount(server)
        .await;

    PachcaClient::connect(config(server, dir).authorization_code("consent-code"))
        .await
        .unwrap()
}

fn funnels_payload() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "name": "Sales",
            "stages": [
                { "id": 10, "name": "New", "sort": 1 },
                { "id": 11, "name": "Won", "sort": "2" }
            ]
        },
        { "id": 2, "name": "Support", "stages": [] }
    ])
}

#[tokio::test]
async fn funnels_listing_is_stable_across_calls() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, dir.path()).await;

    Mock::given(method("GET"))
        .and(path("/funnels"))
        .respond_with(data(funnels_payload()))
        .expect(2)
        .mount(&server)
        .await;

    let first = client.funnels().await.unwrap();
    let second = client.funnels().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].stages[1].name, "Won");
    assert_eq!(first[0].stages[1].sort, 2);
}

#[tokio::test]
async fn users_listing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, dir.path()).await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(data(json!([{
            "id": 3,
            "first_name": "Oleg",
            "last_name": "Smirnov",
            "nickname": "oleg",
            "email": "oleg@example.com",
            "phone_number": "+79990001122",
            "department": "Support",
            "role": "user",
            "suspended": true
        }])))
        .expect(2)
        .mount(&server)
        .await;

    let users = client.users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].full_name(), "Oleg Smirnov");
    assert!(users[0].suspended);
    assert_eq!(client.users().await.unwrap(), users);
}

#[tokio::test]
async fn custom_properties_are_filtered_by_entity() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, dir.path()).await;

    Mock::given(method("GET"))
        .and(path("/custom_properties"))
        .and(query_param("entity_type", "Deal"))
        .respond_with(data(json!([
            { "id": 100, "name": "Source", "data_type": "string" },
            { "id": 101, "name": "Budget", "data_type": "number" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let properties = client.custom_properties(EntityKind::Deal).await.unwrap();
    assert_eq!(properties.len(), 2);
    assert_eq!(properties[1].data_type, "number");
    assert!(properties[0].value.is_none());
}

#[tokio::test]
async fn create_client_normalizes_scalar_phone() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .and(body_json(json!({ "client": { "full_name": "A", "phones": [5] } })))
        .respond_with(data(json!({
            "id": 40,
            "client_number": 12,
            "owner_id": 3,
            "created_at": "2024-03-01T12:00:00.000Z",
            "phones": ["5"],
            "emails": [],
            "organization_id": null,
            "additional": null,
            "list_tags": [],
            "custom_properties": []
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/clients"))
        .and(body_json(json!({ "client": { "full_name": "A", "phones": [5, 6] } })))
        .respond_with(data(json!({ "id": 41, "phones": ["5", "6"] })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_client(&NewClient::new("A").phones(5_i64)).await.unwrap();
    assert_eq!(created.id, 40);
    assert_eq!(created.client_number, Some(12));

    let created = client
        .create_client(&NewClient::new("A").phones(vec![5_i64, 6]))
        .await
        .unwrap();
    assert_eq!(created.phones.len(), 2);
}

#[tokio::test]
async fn create_deal_wraps_text_note_and_passes_object_note() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, dir.path()).await;

    let deal_response = json!({
        "id": 8,
        "owner_id": 3,
        "created_at": "2024-03-01T12:00:00.000Z",
        "name": "Website",
        "client_id": 40,
        "stage_id": 10,
        "cost": 5000,
        "state": "open",
        "custom_properties": []
    });

    Mock::given(method("POST"))
        .and(path("/deals"))
        .and(body_json(json!({
            "deal": {
                "name": "Website",
                "client_id": 40,
                "stage_id": 10,
                "cost": 5000,
                "custom_properties": [{ "id": 100, "value": "ads" }],
                "note": { "content": "hello" }
            }
        })))
        .respond_with(data(deal_response.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/deals"))
        .and(body_json(json!({
            "deal": {
                "name": "Website",
                "client_id": 40,
                "stage_id": 10,
                "note": { "content": "hi", "files": [] }
            }
        })))
        .respond_with(data(deal_response))
        .expect(1)
        .mount(&server)
        .await;

    let deal = client
        .create_deal(
            &NewDeal::new("Website", 40, 10)
                .cost(5000)
                .properties(CustomProperties::new().with("100", "ads"))
                .note("hello"),
        )
        .await
        .unwrap();
    assert_eq!(deal.client_ref(), Some(40));
    assert_eq!(deal.state.as_deref(), Some("open"));

    let note = Note::from_value(json!({ "content": "hi", "files": [] })).unwrap();
    client
        .create_deal(&NewDeal::new("Website", 40, 10).note(note))
        .await
        .unwrap();
}

#[tokio::test]
async fn create_organization_task_and_message() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/organizations"))
        .and(body_json(json!({
            "organization": {
                "name": "Horns & Hooves",
                "custom_properties": [{ "id": 7, "value": 3 }]
            }
        })))
        .respond_with(data(json!({
            "id": 20,
            "name": "Horns & Hooves",
            "inn": null,
            "custom_properties": [{ "id": 7, "name": "Size", "data_type": "number", "value": 3 }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "task": { "kind": "call", "priority": 1, "performer_ids": [3] }
        })))
        .respond_with(data(json!({
            "id": 30,
            "kind": "call",
            "content": null,
            "due_at": null,
            "priority": 1,
            "user_id": 3,
            "status": "undone",
            "created_at": "2024-03-01T12:00:00.000Z",
            "performer_ids": [3]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_json(json!({
            "message": { "entity_type": "Deal", "entity_id": 8, "content": "Invoice sent" }
        })))
        .respond_with(data(json!({
            "id": 50,
            "entity": { "id": 8, "type": "Deal" },
            "content": "Invoice sent",
            "user_id": 3,
            "created_at": "2024-03-01T12:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let organization = client
        .create_organization(&NewOrganization::new().name("Horns & Hooves").property("7", 3))
        .await
        .unwrap();
    assert_eq!(organization.properties[0].value, Some(json!(3)));

    let task = client
        .create_task(&NewTask::new(TaskKind::Call).performer_ids(3_i64))
        .await
        .unwrap();
    assert_eq!(task.performer_ids, vec![3]);
    assert_eq!(task.status.as_deref(), Some("undone"));

    let message = client
        .create_message(&NewMessage::new(8, "Invoice sent"))
        .await
        .unwrap();
    assert_eq!(message.id, 50);
}

#[tokio::test]
async fn invalid_parameters_fail_before_any_request() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, dir.path()).await;
    let requests_after_connect = server.received_requests().await.unwrap().len();

    let result = client.create_organization(&NewOrganization::new()).await;
    assert!(matches!(result, Err(PachcaError::InvalidValue(_))));

    let result = client
        .create_client(&NewClient::new("A").property("not-a-number", 1))
        .await;
    assert!(matches!(result, Err(PachcaError::InvalidValue(_))));

    assert_eq!(
        server.received_requests().await.unwrap().len(),
        requests_after_connect
    );
}

#[tokio::test]
async fn api_error_carries_raw_body() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .respond_with(
            wiremock::ResponseTemplate::new(422)
                .set_body_string(r#"{"errors":[{"key":"full_name","value":"can't be blank"}]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    match client.create_client(&NewClient::new("")).await {
        Err(PachcaError::Api { status, body }) => {
            assert_eq!(status, 422);
            assert!(body.contains("can't be blank"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}
