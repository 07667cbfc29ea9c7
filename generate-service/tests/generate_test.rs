//! Integration tests for `POST /generate` against a spawned server.

mod common;

use common::TestApp;
use generate_service::services::{MockTextProvider, ProviderError};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn returns_provider_text_verbatim() {
    let provider = Arc::new(MockTextProvider::replying("Seven is prime.\n  Really."));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app
        .post_generate(&json!({ "query": "Tell me about 7" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "textResponse": "Seven is prime.\n  Really." }));
    assert_eq!(provider.prompts(), vec!["Tell me about 7"]);
}

#[tokio::test]
async fn provider_failure_is_500_with_message() {
    let provider = Arc::new(MockTextProvider::failing("model 'gemma3' not found"));
    let app = TestApp::spawn(provider).await;

    let response = app.post_generate(&json!({ "query": "hi" })).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Generation failed");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("model 'gemma3' not found"));
}

#[tokio::test]
async fn every_provider_error_kind_collapses_to_500() {
    let provider = Arc::new(MockTextProvider::new(true).with_script(vec![
        Err(ProviderError::Network("connection refused".to_string())),
        Err(ProviderError::InvalidResponse("missing field `response`".to_string())),
        Err(ProviderError::NotConfigured("no backend".to_string())),
    ]));
    let app = TestApp::spawn(provider).await;

    for expected in ["connection refused", "missing field `response`", "no backend"] {
        let response = app.post_generate(&json!({ "query": "x" })).await;
        assert_eq!(response.status().as_u16(), 500);

        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["detail"].as_str().unwrap().contains(expected));
    }
}

#[tokio::test]
async fn missing_query_is_rejected_before_the_provider() {
    let provider = Arc::new(MockTextProvider::new(true));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app.post_generate(&json!({ "prompt": "wrong field" })).await;

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request");
    assert!(body["detail"].as_str().unwrap().contains("query"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::new(true))).await;

    let response = app
        .client
        .post(format!("{}/generate", app.address))
        .header("content-type", "application/json")
        .body("{\"query\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn missing_content_type_is_415() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::new(true))).await;

    let response = app
        .client
        .post(format!("{}/generate", app.address))
        .body("{\"query\": \"hi\"}")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 415);
}

#[tokio::test]
async fn empty_query_is_forwarded_unchanged() {
    let provider = Arc::new(MockTextProvider::replying("?"));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app.post_generate(&json!({ "query": "" })).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(provider.prompts(), vec![""]);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::new(true))).await;

    let response = app
        .client
        .post(format!("{}/generate", app.address))
        .header("x-request-id", "trace-me")
        .json(&json!({ "query": "hi" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let provider = Arc::new(MockTextProvider::new(true));
    let app = Arc::new(TestApp::spawn(provider.clone()).await);

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let response = app.post_generate(&json!({ "query": format!("q{}", i) })).await;
            let body: serde_json::Value = response.json().await.unwrap();
            (i, body["textResponse"].as_str().unwrap().to_string())
        }));
    }

    for handle in handles {
        let (i, text) = handle.await.unwrap();
        assert_eq!(text, format!("Mock response for: q{}", i));
    }
    assert_eq!(provider.calls().len(), 8);
}
