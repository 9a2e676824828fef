// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: HTTP request in, spreadsheet rows and reply out.
//!
//! Each test wires the real knowledge cache, checker, recorder, tools and
//! handler over an in-memory spreadsheet and a scripted model, then drives
//! the gateway router.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::json;
use tower::ServiceExt;

use venuebot_agent::{InMemorySessionStore, InstructionTemplate, MessageHandler, venue_tools};
use venuebot_booking::{Availability, AvailabilityChecker, BookingRecorder};
use venuebot_config::DateOrder;
use venuebot_config::model::{AgentConfig, AvailabilityConfig, BookingConfig, CacheConfig};
use venuebot_core::chat::{ChatPart, ChatResponse};
use venuebot_gateway::{AuthConfig, GatewayState, HealthState, router};
use venuebot_knowledge::{DateNormalizer, FixedClock, KnowledgeCache};
use venuebot_test_utils::{MockProvider, MockStore};

struct Harness {
    store: Arc<MockStore>,
    provider: MockProvider,
    checker: Arc<AvailabilityChecker>,
    app: Router,
}

fn harness(provider: MockProvider) -> Harness {
    let store = Arc::new(
        MockStore::new()
            .with_table(
                "General_Info",
                &["Key", "Value"],
                &[
                    &["Admin_Phone", "1001234567"],
                    &["Deposit_Night", "5000"],
                    &["Venue_Name", "Qasr El Nour"],
                ],
            )
            .with_table(
                "Packages",
                &["Package_ID", "Name_Arabic", "Season", "Guests", "Price", "Details"],
                &[&["P1", "Gold", "Summer", "300", "45000", "DJ and lights"]],
            )
            .with_table("Buffet_Options", &["Package_ID", "Level_Name", "Price", "Items"], &[])
            .with_table("Extras", &["Item_Name", "Category", "Price"], &[])
            .with_table(
                "Bookings",
                &[
                    "Date",
                    "Time_Slot",
                    "Status",
                    "Client_Name",
                    "Phone",
                    "Package_Interest",
                    "Total_Price",
                    "Details",
                    "Timestamp",
                ],
                &[&["2026-04-10", "Night", "Booked", "Old Client", "01011111111", "P1", "", "", ""]],
            ),
    );

    let clock = Arc::new(FixedClock::at_noon(
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
    ));
    let knowledge = Arc::new(KnowledgeCache::new(
        store.clone(),
        clock.clone(),
        &CacheConfig::default(),
    ));
    let checker = Arc::new(AvailabilityChecker::new(
        store.clone(),
        clock.clone(),
        DateNormalizer::new(DateOrder::DayFirst),
        &AvailabilityConfig::default(),
    ));
    let recorder = Arc::new(BookingRecorder::new(
        store.clone(),
        knowledge.clone(),
        checker.clone(),
        clock.clone(),
        BookingConfig::default(),
    ));
    let handler = MessageHandler::new(
        Arc::new(provider.clone()),
        Arc::new(venue_tools(knowledge.clone(), checker.clone(), recorder)),
        Arc::new(InMemorySessionStore::with_limits(10, Duration::from_secs(600))),
        knowledge,
        clock,
        InstructionTemplate::new("You are {agent_name}. Admin: {admin_phone}.\n{knowledge_base}"),
        &AgentConfig::default(),
    );

    let state = GatewayState {
        handler: Arc::new(handler),
        verify_token: Some(SecretString::from("verify-me")),
        messenger: None,
        health: HealthState {
            start_time: std::time::Instant::now(),
            adapters: Vec::new(),
        },
    };
    let auth = AuthConfig {
        bearer_token: Some(SecretString::from("api-token")),
    };

    Harness {
        store,
        provider,
        checker,
        app: router(state, &auth),
    }
}

async fn chat(app: &Router, sender: &str, content: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::post("/v1/messages")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer api-token")
                .body(Body::from(
                    json!({"content": content, "sender_id": sender}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn booked_date_is_reported_through_the_api() {
    let provider = MockProvider::new();
    provider
        .push(ChatResponse::call(
            "check_availability",
            json!({"date_str": "2026-04-10", "time_slot": "night"}),
        ))
        .await;
    provider
        .push(ChatResponse::text("Sorry, that night is taken."))
        .await;
    let h = harness(provider);

    let body = chat(&h.app, "customer-1", "Is 10/4 free at night?").await;
    assert_eq!(body["reply"], "Sorry, that night is taken.");
    assert_eq!(body["sender_id"], "customer-1");

    let requests = h.provider.requests().await;
    assert_eq!(requests.len(), 2);
    let tool_turn = requests[1].turns.last().unwrap();
    assert_eq!(
        tool_turn.parts,
        [ChatPart::FunctionResponse {
            name: "check_availability".into(),
            response: json!({"result": "Booked"}),
        }]
    );
    assert!(requests[0].system_instruction.contains("01001234567"));
    assert!(requests[0].system_instruction.contains("Qasr El Nour"));
}

#[tokio::test]
async fn booking_through_the_api_blocks_the_slot() {
    let provider = MockProvider::new();
    provider
        .push(ChatResponse::call(
            "book_date",
            json!({
                "date_str": "2026-05-01",
                "time_slot": "night",
                "name": "Mona Adel Hassan",
                "phone": "01098765432",
                "package_name": "Gold",
                "total_price": "45000",
                "details_summary": "Gold package"
            }),
        ))
        .await;
    provider.push(ChatResponse::text("Booked for you!")).await;
    let h = harness(provider);

    assert_eq!(
        h.checker.check("2026-05-01", "night").await,
        Availability::Available
    );

    let body = chat(&h.app, "customer-2", "Please confirm the booking").await;
    assert_eq!(body["reply"], "Booked for you!");
    assert_eq!(h.store.append_count(), 1);

    let rows = h.store.raw_rows("Bookings");
    let appended = rows.last().unwrap();
    assert_eq!(appended[0], "2026-05-01");
    assert_eq!(appended[3], "Mona Adel Hassan");

    assert_eq!(
        h.checker.check("2026-05-01", "night").await,
        Availability::Booked
    );
}

#[tokio::test]
async fn webhook_event_reaches_the_model() {
    let h = harness(MockProvider::with_replies(&["Welcome to the venue!"]));

    let payload = json!({
        "object": "page",
        "entry": [{"messaging": [{
            "sender": {"id": "PSID-1"},
            "message": {"text": "Hello"}
        }]}]
    });
    let response = h
        .app
        .clone()
        .oneshot(
            Request::post("/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.provider.call_count().await, 1);
    assert_eq!(h.provider.requests().await[0].turns[0].text(), "Hello");
}

#[tokio::test]
async fn model_failure_returns_apology_and_next_message_recovers() {
    let provider = MockProvider::new();
    provider.push_error("upstream unavailable").await;
    provider.push(ChatResponse::text("How can I help?")).await;
    let h = harness(provider);

    let first = chat(&h.app, "customer-3", "Hi").await;
    assert_eq!(first["reply"], AgentConfig::default().error_reply);

    let second = chat(&h.app, "customer-3", "Hi again").await;
    assert_eq!(second["reply"], "How can I help?");

    // The failed conversation was evicted, so the retry starts from scratch.
    let requests = h.provider.requests().await;
    assert_eq!(requests[1].turns.len(), 1);
    assert_eq!(requests[1].turns[0].text(), "Hi again");
}
