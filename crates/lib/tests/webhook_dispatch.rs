//! End-to-end webhook tests: boot the gateway against a mock translation
//! provider and a mock LINE reply endpoint on loopback, then POST signed
//! webhook bodies. No external services are contacted.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lib::config::Config;
use lib::dispatch;
use lib::gateway;
use lib::line::signature;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CHANNEL_SECRET: &str = "test-channel-secret";

/// How the mock provider answers /get.
#[derive(Clone, Copy)]
enum ProviderMode {
    Translated,
    MissingField,
    Failing,
}

/// Mock of both external collaborators: the translation provider (GET /get)
/// and the LINE reply API (POST /v2/bot/message/reply).
#[derive(Clone)]
struct MockPlatform {
    mode: ProviderMode,
    translate_calls: Arc<Mutex<Vec<String>>>,
    replies: Arc<Mutex<Vec<Value>>>,
}

impl MockPlatform {
    fn translate_calls(&self) -> Vec<String> {
        self.translate_calls.lock().unwrap().clone()
    }

    fn replies(&self) -> Vec<Value> {
        self.replies.lock().unwrap().clone()
    }
}

async fn mock_translate(
    State(s): State<MockPlatform>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    s.translate_calls
        .lock()
        .unwrap()
        .push(params.get("langpair").cloned().unwrap_or_default());
    match s.mode {
        ProviderMode::Translated => Json(json!({
            "responseData": { "translatedText": "สวัสดีโลก" },
            "responseStatus": 200
        }))
        .into_response(),
        ProviderMode::MissingField => {
            Json(json!({ "responseStatus": 200 })).into_response()
        }
        ProviderMode::Failing => {
            (StatusCode::INTERNAL_SERVER_ERROR, "provider down").into_response()
        }
    }
}

async fn mock_reply(State(s): State<MockPlatform>, Json(body): Json<Value>) -> Json<Value> {
    s.replies.lock().unwrap().push(body);
    Json(json!({}))
}

async fn start_mock(mode: ProviderMode) -> (u16, MockPlatform) {
    let state = MockPlatform {
        mode,
        translate_calls: Arc::new(Mutex::new(Vec::new())),
        replies: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/get", get(mock_translate))
        .route("/v2/bot/message/reply", post(mock_reply))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock");
    let port = listener.local_addr().expect("local_addr").port();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (port, state)
}

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

async fn start_gateway(mock_port: u16) -> u16 {
    let port = free_port();
    let mut config = Config::default();
    config.gateway.port = port;
    config.gateway.bind = "127.0.0.1".to_string();
    config.channels.line.channel_secret = Some(CHANNEL_SECRET.to_string());
    config.channels.line.channel_access_token = Some("test-access-token".to_string());
    config.channels.line.api_base = Some(format!("http://127.0.0.1:{}", mock_port));
    config.translate.endpoint = Some(format!("http://127.0.0.1:{}", mock_port));
    tokio::spawn(async move {
        let _ = gateway::run_gateway(config).await;
    });

    let url = format!("http://127.0.0.1:{}/", port);
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return port;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gateway did not become healthy on port {}", port);
}

async fn post_webhook(port: u16, body: &str, sig: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/webhook", port))
        .header("x-line-signature", sig)
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .expect("post webhook")
}

async fn post_signed(port: u16, body: &str) -> reqwest::Response {
    let sig = signature::sign(CHANNEL_SECRET, body.as_bytes());
    post_webhook(port, body, &sig).await
}

#[tokio::test]
async fn signed_webhook_translates_and_replies() {
    let (mock_port, mock) = start_mock(ProviderMode::Translated).await;
    let port = start_gateway(mock_port).await;

    let body = json!({
        "events": [
            {
                "type": "message",
                "replyToken": "reply-token-1",
                "message": { "id": "1", "type": "text", "text": "Hello world" }
            },
            { "type": "follow", "replyToken": "reply-token-2" }
        ]
    })
    .to_string();
    let resp = post_signed(port, &body).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.expect("parse response");
    assert_eq!(json.get("success"), Some(&json!(true)));
    assert_eq!(json.get("results"), Some(&json!(["replied", "skipped"])));

    assert_eq!(mock.translate_calls(), vec!["en|th".to_string()]);
    let replies = mock.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(
        replies[0].get("replyToken"),
        Some(&json!("reply-token-1"))
    );
    assert_eq!(
        replies[0].pointer("/messages/0"),
        Some(&json!({ "type": "text", "text": "สวัสดีโลก" }))
    );
}

#[tokio::test]
async fn rejected_signature_makes_no_outbound_calls() {
    let (mock_port, mock) = start_mock(ProviderMode::Translated).await;
    let port = start_gateway(mock_port).await;

    let body = json!({
        "events": [{
            "type": "message",
            "replyToken": "reply-token-1",
            "message": { "type": "text", "text": "Hello" }
        }]
    })
    .to_string();
    let resp = post_webhook(port, &body, "bm90IGEgcmVhbCBzaWduYXR1cmU=").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(mock.translate_calls().is_empty());
    assert!(mock.replies().is_empty());
}

#[tokio::test]
async fn malformed_batch_returns_400_without_dispatch() {
    let (mock_port, mock) = start_mock(ProviderMode::Translated).await;
    let port = start_gateway(mock_port).await;

    for body in [r#"{"events": "nope"}"#, r#"{"destination": "abc"}"#, "not json"] {
        let resp = post_signed(port, body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let json: Value = resp.json().await.expect("parse response");
        assert_eq!(json.get("error"), Some(&json!("invalid events format")));
    }
    assert!(mock.translate_calls().is_empty());
    assert!(mock.replies().is_empty());
}

#[tokio::test]
async fn provider_failure_yields_apology_reply() {
    let (mock_port, mock) = start_mock(ProviderMode::Failing).await;
    let port = start_gateway(mock_port).await;

    let body = json!({
        "events": [{
            "type": "message",
            "replyToken": "reply-token-1",
            "message": { "type": "text", "text": "Hello" }
        }]
    })
    .to_string();
    let resp = post_signed(port, &body).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.expect("parse response");
    assert_eq!(json.get("results"), Some(&json!(["repliedWithError"])));

    let replies = mock.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(
        replies[0].pointer("/messages/0/text"),
        Some(&json!(dispatch::PROVIDER_FAILURE_REPLY))
    );
}

#[tokio::test]
async fn missing_translated_text_yields_fixed_fallback() {
    let (mock_port, mock) = start_mock(ProviderMode::MissingField).await;
    let port = start_gateway(mock_port).await;

    let body = json!({
        "events": [{
            "type": "message",
            "replyToken": "reply-token-1",
            "message": { "type": "text", "text": "Hello" }
        }]
    })
    .to_string();
    let resp = post_signed(port, &body).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.expect("parse response");
    assert_eq!(json.get("results"), Some(&json!(["replied"])));
    assert_eq!(
        mock.replies()[0].pointer("/messages/0/text"),
        Some(&json!(dispatch::UNTRANSLATABLE_REPLY))
    );
}
