//! Integration tests for the Affinity client using WireMock

use domain::FieldValueFilter;
use integration_affinity::{
    AffinityClient, AffinityConfig, AffinityError, NewFieldValue, NewListEntry,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

/// `Basic base64(":test-key")`
const AUTH_HEADER: &str = "Basic OnRlc3Qta2V5";

fn client_for(server: &MockServer) -> AffinityClient {
    let config = AffinityConfig::with_api_key("test-key").with_base_url(server.uri());
    AffinityClient::new(&config).unwrap()
}

#[tokio::test]
async fn search_organizations_sends_term_and_basic_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(query_param("term", "acme.com"))
        .and(header("Authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizations": [
                {"id": 64, "name": "Acme", "domain": "acme.com",
                 "domains": ["acme.com", "acme.io"], "global": false}
            ],
            "next_page_token": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = client_for(&mock_server)
        .search_organizations("acme.com")
        .await
        .unwrap();

    assert_eq!(page.organizations.len(), 1);
    assert_eq!(page.organizations[0].id, 64);
    assert_eq!(page.organizations[0].domains, vec!["acme.com", "acme.io"]);
}

#[tokio::test]
async fn create_organization_posts_name_and_domain() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/organizations"))
        .and(body_json(json!({"name": "Acme", "domain": "acme.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 65, "name": "Acme", "domain": "acme.com", "domains": ["acme.com"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = client_for(&mock_server)
        .create_organization("Acme", "acme.com")
        .await
        .unwrap();

    assert_eq!(created.id, 65);
    assert_eq!(created.domain.as_deref(), Some("acme.com"));
}

#[tokio::test]
async fn create_list_entry_omits_missing_creator() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/list-entries"))
        .and(body_json(json!({"list_id": 10, "entity_id": 64})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "list_id": 10, "entity_id": 64,
            "created_at": "2024-05-01T12:00:00.000-07:00"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let entry = client_for(&mock_server)
        .create_list_entry(&NewListEntry {
            list_id: 10,
            entity_id: 64,
            creator_id: None,
        })
        .await
        .unwrap();

    assert_eq!(entry.id, 3);
    assert_eq!(entry.created_at.to_rfc3339(), "2024-05-01T19:00:00+00:00");
}

#[tokio::test]
async fn get_organization_requests_interaction_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/64"))
        .and(query_param("with_opportunities", "true"))
        .and(query_param("with_interaction_dates", "true"))
        .and(query_param("with_interaction_persons", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 64,
            "name": "Acme",
            "domain": "acme.com",
            "domains": ["acme.com"],
            "list_entries": [
                {"id": 1, "list_id": 10, "creator_id": 5, "entity_id": 64,
                 "created_at": "2021-01-01T10:00:00.000-08:00"},
                {"id": 2, "list_id": 10, "creator_id": 5, "entity_id": 64,
                 "created_at": "2022-03-01T10:00:00.000-08:00"}
            ],
            "opportunity_ids": [117]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let details = client_for(&mock_server).get_organization(64).await.unwrap();

    assert_eq!(details.list_entries.len(), 2);
    assert_eq!(details.list_entries[1].id, 2);
    assert_eq!(details.opportunity_ids, vec![117]);
}

#[tokio::test]
async fn field_values_use_filter_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/field-values"))
        .and(query_param("organization_id", "64"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "field_id": 100, "entity_id": 64, "list_entry_id": 2,
             "value": {"id": 7, "text": "Active"}},
            {"id": 2, "field_id": 200, "entity_id": 64, "list_entry_id": null, "value": true}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filter = FieldValueFilter::from_keys(Some(64), None, None, None).unwrap();
    let values = client_for(&mock_server)
        .get_field_values(&filter)
        .await
        .unwrap();

    assert_eq!(values.len(), 2);
    assert_eq!(values[0].list_entry_id, Some(2));
    assert_eq!(values[0].value["text"], "Active");
    assert!(values[1].list_entry_id.is_none());
}

#[tokio::test]
async fn create_field_value_posts_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/field-values"))
        .and(body_json(json!({"field_id": 100, "entity_id": 64, "value": "High"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "field_id": 100, "entity_id": 64, "list_entry_id": null, "value": "High"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = client_for(&mock_server)
        .create_field_value(&NewFieldValue {
            field_id: 100,
            entity_id: 64,
            value: json!("High"),
            list_entry_id: None,
        })
        .await
        .unwrap();

    assert_eq!(created.id, 9);
}

#[tokio::test]
async fn update_field_value_puts_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/field-values/9"))
        .and(body_json(json!({"value": "Low"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "field_id": 100, "value": "Low"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let updated = client_for(&mock_server)
        .update_field_value(9, json!("Low"))
        .await
        .unwrap();

    assert_eq!(updated.value, json!("Low"));
}

#[tokio::test]
async fn get_reminder_parses_people() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reminders/15562"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 15562,
            "type": 1,
            "created_at": "2021-11-22T09:31:52.415-08:00",
            "completed_at": null,
            "content": "Recurring reminder",
            "due_date": "2021-12-22T09:31:52.415-08:00",
            "reset_type": 0,
            "reminder_days": 30,
            "status": 1,
            "creator": {"id": 443, "type": 1, "first_name": "John", "last_name": "Doe",
                        "primary_email": "john@affinity.co", "emails": ["john@affinity.co"]},
            "owner": {"id": 443, "type": 1, "first_name": "John", "last_name": "Doe",
                      "primary_email": "john@affinity.co", "emails": ["john@affinity.co"]},
            "completer": null,
            "person": null,
            "organization": null,
            "opportunity": {"id": 117, "name": "Series A"}
        })))
        .mount(&mock_server)
        .await;

    let reminder = client_for(&mock_server).get_reminder(15562).await.unwrap();

    assert_eq!(reminder.status, 1);
    assert_eq!(reminder.owner.first_name.as_deref(), Some("John"));
    assert_eq!(reminder.opportunity.unwrap().id, 117);
}

#[tokio::test]
async fn not_found_is_mapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).get_organization(1).await.unwrap_err();
    assert!(matches!(err, AffinityError::NotFound(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unauthorized_is_an_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .search_persons("john")
        .await
        .unwrap_err();
    assert!(matches!(err, AffinityError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn rate_limit_reads_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .search_organizations("acme")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AffinityError::RateLimitExceeded {
            retry_after_secs: Some(12)
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn server_error_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .search_organizations("acme")
        .await
        .unwrap_err();

    match err {
        AffinityError::ServerError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .search_organizations("acme")
        .await
        .unwrap_err();
    assert!(matches!(err, AffinityError::ParseError(_)));
}
