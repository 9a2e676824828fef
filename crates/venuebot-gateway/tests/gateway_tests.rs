// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use venuebot_core::SessionId;
use venuebot_gateway::{
    AuthConfig, ConversationHandler, GatewayState, HealthState, MessengerClient, router,
};

/// Echoes messages back and remembers who asked what.
#[derive(Default)]
struct EchoHandler {
    seen: Mutex<Vec<(String, String)>>,
}

impl EchoHandler {
    fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationHandler for EchoHandler {
    async fn reply(&self, text: &str, identity: &SessionId) -> String {
        self.seen
            .lock()
            .unwrap()
            .push((identity.0.clone(), text.to_string()));
        format!("echo: {text}")
    }

    async fn open_conversations(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

fn state(handler: Arc<EchoHandler>, messenger: Option<Arc<MessengerClient>>) -> GatewayState {
    GatewayState {
        handler,
        verify_token: Some(SecretString::from("hall-secret")),
        messenger,
        health: HealthState {
            start_time: std::time::Instant::now(),
            adapters: Vec::new(),
        },
    }
}

fn no_auth() -> AuthConfig {
    AuthConfig { bearer_token: None }
}

fn with_bearer() -> AuthConfig {
    AuthConfig {
        bearer_token: Some(SecretString::from("api-token")),
    }
}

fn app(handler: Arc<EchoHandler>) -> Router {
    router(state(handler, None), &no_auth())
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn webhook_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn page_message(sender: &str, text: &str) -> String {
    serde_json::json!({
        "object": "page",
        "entry": [{"messaging": [{
            "sender": {"id": sender},
            "recipient": {"id": "PAGE"},
            "message": {"mid": "m1", "text": text}
        }]}]
    })
    .to_string()
}

#[tokio::test]
async fn root_reports_liveness() {
    let response = app(Arc::default())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "venuebot is running");
}

#[tokio::test]
async fn verification_echoes_challenge_on_matching_token() {
    let uri = "/webhook?hub.mode=subscribe&hub.verify_token=hall-secret&hub.challenge=1158201444";
    let response = app(Arc::default())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "1158201444");
}

#[tokio::test]
async fn verification_rejects_wrong_or_missing_token() {
    for uri in [
        "/webhook?hub.mode=subscribe&hub.verify_token=nope&hub.challenge=1",
        "/webhook?hub.mode=subscribe&hub.challenge=1",
    ] {
        let response = app(Arc::default())
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body_text(response).await, "Invalid verification token");
    }
}

#[tokio::test]
async fn verification_fails_closed_without_configured_token() {
    let mut st = state(Arc::default(), None);
    st.verify_token = None;
    let uri = "/webhook?hub.mode=subscribe&hub.verify_token=&hub.challenge=1";
    let response = router(st, &no_auth())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn webhook_message_reaches_handler_with_sender_identity() {
    let handler = Arc::new(EchoHandler::default());
    let response = app(handler.clone())
        .oneshot(webhook_post(&page_message("USER_1", "Is 10/04/2026 free?")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        handler.seen(),
        vec![("USER_1".to_string(), "Is 10/04/2026 free?".to_string())]
    );
}

#[tokio::test]
async fn echoes_and_non_page_objects_are_skipped() {
    let handler = Arc::new(EchoHandler::default());
    let echo = serde_json::json!({
        "object": "page",
        "entry": [{"messaging": [{
            "sender": {"id": "PAGE"},
            "message": {"text": "our own reply", "is_echo": true}
        }]}]
    })
    .to_string();
    let instagram = page_message("USER_2", "hi").replace("\"page\"", "\"instagram\"");

    for body in [echo, instagram] {
        let response = app(handler.clone())
            .oneshot(webhook_post(&body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert!(handler.seen().is_empty());
}

#[tokio::test]
async fn malformed_webhook_is_acknowledged() {
    let handler = Arc::new(EchoHandler::default());
    let response = app(handler.clone())
        .oneshot(webhook_post("{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(handler.seen().is_empty());
}

#[tokio::test]
async fn api_route_absent_without_bearer_token() {
    let response = app(Arc::default())
        .oneshot(
            Request::post("/v1/messages")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"content":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_requires_matching_bearer() {
    let handler = Arc::new(EchoHandler::default());
    let app = router(state(handler.clone(), None), &with_bearer());

    let rejected = app
        .clone()
        .oneshot(
            Request::post("/v1/messages")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .body(Body::from(r#"{"content":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

    let accepted = app
        .oneshot(
            Request::post("/v1/messages")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer api-token")
                .body(Body::from(r#"{"content":"hi","sender_id":"web-7"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(accepted).await).unwrap();
    assert_eq!(json["reply"], "echo: hi");
    assert_eq!(json["sender_id"], "web-7");
    assert_eq!(handler.seen(), vec![("web-7".to_string(), "hi".to_string())]);
}

#[tokio::test]
async fn api_assigns_sender_when_absent() {
    let app = router(state(Arc::default(), None), &with_bearer());
    let response = app
        .oneshot(
            Request::post("/v1/messages")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer api-token")
                .body(Body::from(r#"{"content":"hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let sender = json["sender_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(sender).is_ok());
}

#[tokio::test]
async fn health_reports_version_and_open_conversations() {
    let handler = Arc::new(EchoHandler::default());
    handler.reply("warm up", &SessionId("u".into())).await;

    let response = app(handler)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["open_conversations"], 1);
    assert!(json["adapters"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_reply_is_sent_through_messenger() {
    let graph = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v21.0/me/messages"))
        .and(query_param("access_token", "page-token"))
        .and(body_partial_json(serde_json::json!({
            "recipient": {"id": "USER_9"},
            "messaging_type": "RESPONSE",
            "message": {"text": "echo: hello"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"recipient_id": "USER_9", "message_id": "m.1"}),
        ))
        .expect(1)
        .mount(&graph)
        .await;

    let messenger = MessengerClient::new(
        &format!("{}/v21.0", graph.uri()),
        SecretString::from("page-token"),
    )
    .unwrap();
    let handler = Arc::new(EchoHandler::default());
    let app = router(state(handler, Some(Arc::new(messenger))), &no_auth());

    let response = app
        .oneshot(webhook_post(&page_message("USER_9", "hello")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn failed_send_still_acknowledges_webhook() {
    let graph = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad recipient"))
        .mount(&graph)
        .await;

    let messenger =
        MessengerClient::new(&graph.uri(), SecretString::from("page-token")).unwrap();
    let handler = Arc::new(EchoHandler::default());
    let app = router(state(handler.clone(), Some(Arc::new(messenger))), &no_auth());

    let response = app
        .oneshot(webhook_post(&page_message("USER_3", "hi")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(handler.seen().len(), 1);
}
