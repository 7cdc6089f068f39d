//! Route-level tests against the full router

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use ccf_api::{build_router, ApiState};
use ccf_engine::ClassifierEngine;
use serde_json::{json, Value};
use std::sync::Arc;

fn server() -> TestServer {
    let state = ApiState {
        engine: Arc::new(ClassifierEngine::new()),
    };
    TestServer::new(build_router(state)).expect("router must build")
}

fn project_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-project-id"),
        HeaderValue::from_static("p1"),
    )
}

#[tokio::test]
async fn test_health() {
    let server = server();
    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_scope_header_is_required() {
    let server = server();
    let response = server.get("/api/v1/classifications").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "MISSING_PROJECT_ID");
}

#[tokio::test]
async fn test_classification_crud() {
    let server = server();
    let (name, value) = project_header();

    let response = server
        .post("/api/v1/classifications")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "c_type": "ipv4",
            "name": "web",
            "definition": {"protocol": 6, "src_addr": "10.0.0.1"}
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["c_type"], "ipv4");
    assert_eq!(body["data"]["definition"]["protocol"], 6);
    assert_eq!(body["data"]["definition"]["dscp"], Value::Null);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = server
        .get(&format!("/api/v1/classifications/{id}"))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::OK);

    let response = server
        .put(&format!("/api/v1/classifications/{id}"))
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "renamed"}))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "renamed");

    let response = server
        .put(&format!("/api/v1/classifications/{id}"))
        .add_header(name.clone(), value.clone())
        .json(&json!({"negated": "true"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_UPDATE_REQUEST");

    let response = server
        .delete(&format!("/api/v1/classifications/{id}"))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/v1/classifications/{id}"))
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_definition_is_a_bad_request() {
    let server = server();
    let (name, value) = project_header();

    let response = server
        .post("/api/v1/classifications")
        .add_header(name, value)
        .json(&json!({
            "c_type": "ipv4",
            "definition": {"dscp": 5}
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_CLASSIFICATION_MARK");
}

#[tokio::test]
async fn test_group_lifecycle_and_consumed_conflicts() {
    let server = server();
    let (name, value) = project_header();

    let mut ids = Vec::new();
    for definition in [
        json!({"c_type": "ipv4", "definition": {"protocol": 6}}),
        json!({"c_type": "tcp", "definition": {"dst_port_min": 80, "dst_port_max": 80}}),
    ] {
        let response = server
            .post("/api/v1/classifications")
            .add_header(name.clone(), value.clone())
            .json(&definition)
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let response = server
        .post("/api/v1/classification-groups")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "name": "web",
            "operator": "AND",
            "classifications": ids,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let group_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = server
        .get(&format!("/api/v1/classification-groups/{group_id}"))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["classifications"].as_array().unwrap().len(), 2);

    let classification_id = body["data"]["classifications"][0]["id"].as_str().unwrap();
    let response = server
        .delete(&format!("/api/v1/classifications/{classification_id}"))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let conflict: Value = response.json();
    assert_eq!(conflict["error"]["code"], "CONSUMED_CLASSIFICATION");

    let response = server
        .delete(&format!("/api/v1/classification-groups/{group_id}"))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server
        .delete(&format!("/api/v1/classifications/{classification_id}"))
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_type_listing_for_form_generation() {
    let server = server();
    let response = server.get("/api/v1/classification-types").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    let types = body["data"].as_array().unwrap();
    assert_eq!(types.len(), 5);
    let udp = types.iter().find(|t| t["name"] == "udp").unwrap();
    assert!(udp["fields"]
        .as_array()
        .unwrap()
        .contains(&json!("length_min")));
}

#[tokio::test]
async fn test_list_filter_by_type() {
    let server = server();
    let (name, value) = project_header();

    for definition in [
        json!({"c_type": "udp", "definition": {"dst_port_min": 53}}),
        json!({"c_type": "tcp", "definition": {"dst_port_min": 443}}),
    ] {
        server
            .post("/api/v1/classifications")
            .add_header(name.clone(), value.clone())
            .json(&definition)
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server
        .get("/api/v1/classifications")
        .add_query_param("c_type", "udp")
        .add_header(name.clone(), value.clone())
        .await;
    let body: Value = response.json();
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["c_type"], "udp");

    let response = server
        .get("/api/v1/classifications")
        .add_header(name, value)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
