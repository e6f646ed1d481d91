#![allow(clippy::unwrap_used)]
// Integration tests for `AbfClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use abflow_api::{AbfClient, Error, NewFlow, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AbfClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = AbfClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn api_path(suffix: &str) -> String {
    format!("/BusinessFlow/rest/v1/{suffix}")
}

fn flow_json(id: u64, name: &str, flow_type: &str) -> serde_json::Value {
    json!({
        "flowID": id,
        "name": name,
        "flowType": flow_type,
        "sources": [{ "name": "192.168.0.0/16" }],
        "destinations": [{ "name": "16.47.71.62" }],
        "services": [{ "name": "HTTPS" }],
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .and(body_json(json!({ "username": "admin", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "s3cret".to_string().into();
    client.login("admin", &secret).await.unwrap();
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_session_cookie_is_reused() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = AbfClient::new(base_url, &TransportConfig::default()).unwrap();

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=abc; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("applications")))
        .and(wiremock::matchers::header("cookie", "JSESSIONID=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    client.login("admin", &secret).await.unwrap();
    let apps = client.get_applications().await.unwrap();
    assert!(apps.is_empty());
}

// ── Application tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_get_applications() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "app1", "revisionID": 11, "revisionStatus": "Draft" },
            { "name": "app2", "revisionID": 12, "revisionStatus": "Active" },
        ])))
        .mount(&server)
        .await;

    let apps = client.get_applications().await.unwrap();
    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].name, "app1");
    assert!(apps[0].is_draft());
    assert_eq!(apps[1].revision_id, Some(12));
}

#[tokio::test]
async fn test_get_applications_tolerates_missing_revision() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "name": "app1" }, { "name": "app2" }])),
        )
        .mount(&server)
        .await;

    let apps = client.get_applications().await.unwrap();
    let names: Vec<_> = apps.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["app1", "app2"]);
    assert!(apps.iter().all(|a| a.revision_id.is_none()));
}

#[tokio::test]
async fn test_get_app_revision_id_by_name_without_revision() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications/name/app1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "app1" })))
        .mount(&server)
        .await;

    let result = client.get_app_revision_id_by_name("app1").await;
    assert!(
        matches!(result, Err(Error::MissingRevision { ref name }) if name == "app1"),
        "expected MissingRevision, got: {result:?}"
    );
}

#[tokio::test]
async fn test_get_app_revision_id_by_name_unknown_application() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications/name/ghost")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Application not found" })),
        )
        .mount(&server)
        .await;

    let err = client.get_app_revision_id_by_name("ghost").await.unwrap_err();
    assert!(err.is_not_found(), "expected a not-found error, got: {err:?}");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_get_app_revision_id_by_name_encodes_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications/name/HR%20Payroll")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "HR Payroll", "revisionID": 8888 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let revision = client.get_app_revision_id_by_name("HR Payroll").await.unwrap();
    assert_eq!(revision, 8888);
}

#[tokio::test]
async fn test_create_application_sends_name_only() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("applications/new")))
        .and(body_json(json!({
            "name": "payroll",
            "custom_fields": [],
            "contacts": [],
            "labels": [],
            "flows": [],
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "payroll", "revisionID": 1 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_application("payroll").await.unwrap();
    assert_eq!(created.revision_id, Some(1));
}

#[tokio::test]
async fn test_decommission_and_apply_draft() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("applications/42/decommission")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("applications/43/apply")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client.decommission_application(42).await.unwrap();
    client.apply_application_draft(43).await.unwrap();
}

#[tokio::test]
async fn test_api_error_message_is_extracted() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications/name/missing")))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "message": "Application missing not found" })),
        )
        .mount(&server)
        .await;

    let err = client.get_application_by_name("missing").await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Application missing not found");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_applications().await.unwrap_err();
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.get_applications().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("maintenance")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Flow tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_application_flows_skips_other_kinds() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications/8888/flows")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "shared", "flowType": "SHARED_FLOW" },
            flow_json(1, "flow1", "APPLICATION_FLOW"),
            flow_json(2, "shared2", "SHARED_FLOW"),
        ])))
        .mount(&server)
        .await;

    let flows = client.get_application_flows(8888).await.unwrap();
    assert_eq!(flows.len(), 1);
    assert_eq!(flows[0].name, "flow1");
    assert!(flows[0].is_application_flow());
}

#[tokio::test]
async fn test_get_application_flow_by_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("applications/8888/flows")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            flow_json(1, "flow1", "APPLICATION_FLOW"),
            flow_json(3, "flow3", "APPLICATION_FLOW"),
        ])))
        .mount(&server)
        .await;

    let flow = client.get_application_flow_by_name(8888, "flow3").await.unwrap();
    assert_eq!(flow.flow_id, 3);

    let missing = client.get_application_flow_by_name(8888, "nope").await;
    assert!(
        matches!(missing, Err(Error::FlowNotFound { revision_id: 8888, .. })),
        "expected FlowNotFound, got: {missing:?}"
    );
}

#[tokio::test]
async fn test_create_application_flow_posts_single_element_batch() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("applications/8888/flows/new")))
        .and(body_json(json!([{
            "type": "APPLICATION",
            "name": "flow-name",
            "sources": [{ "name": "source1" }, { "name": "source2" }],
            "destinations": [{ "name": "dest1" }],
            "services": [{ "name": "tcp/80" }],
            "users": [],
            "network_applications": [],
            "comment": "",
            "custom_fields": [],
        }])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([flow_json(77, "flow-name", "APPLICATION_FLOW")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let flow = NewFlow {
        name: "flow-name".into(),
        sources: vec!["source1".into(), "source2".into()],
        destinations: vec!["dest1".into()],
        services: vec!["tcp/80".into()],
        ..NewFlow::default()
    };
    let created = client.create_application_flow(8888, &flow).await.unwrap();
    assert_eq!(created.flow_id, 77);
}

#[tokio::test]
async fn test_delete_flow_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api_path("applications/8888/flows/1394")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_flow_by_id(8888, 1394).await.unwrap();
}
