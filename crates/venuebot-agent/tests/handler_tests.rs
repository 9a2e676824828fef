// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end conversations through the message handler with a scripted
//! model and an in-memory spreadsheet.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use tracing_test::traced_test;

use venuebot_agent::{
    InMemorySessionStore, InstructionTemplate, MessageHandler, SessionStore, venue_tools,
};
use venuebot_booking::{AvailabilityChecker, BookingRecorder};
use venuebot_config::DateOrder;
use venuebot_config::model::{AgentConfig, AvailabilityConfig, BookingConfig, CacheConfig};
use venuebot_core::chat::{ChatPart, ChatResponse, Role};
use venuebot_core::SessionId;
use venuebot_knowledge::{DateNormalizer, FixedClock, KnowledgeCache};
use venuebot_test_utils::{MockProvider, MockStore};

const BOOKING_HEADERS: &[&str] = &[
    "Date",
    "Time_Slot",
    "Status",
    "Client_Name",
    "Phone",
    "Package_Interest",
    "Total_Price",
    "Details",
    "Timestamp",
];

struct Fixture {
    store: Arc<MockStore>,
    provider: MockProvider,
    sessions: Arc<InMemorySessionStore>,
    handler: MessageHandler,
}

fn facts(admin_phone: &str) -> Vec<[&str; 2]> {
    vec![
        ["Admin_Phone", admin_phone],
        ["Deposit_Night", "5000"],
        ["Deposit_Day", "3000"],
    ]
}

fn set_facts(store: &MockStore, admin_phone: &str) {
    let rows = facts(admin_phone);
    let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
    store.set_table("General_Info", &["Key", "Value"], &rows);
}

fn fixture_with(provider: MockProvider, agent: AgentConfig) -> Fixture {
    let store = Arc::new(
        MockStore::new()
            .with_table(
                "Packages",
                &["Package_ID", "Name_Arabic", "Season", "Guests", "Price", "Details"],
                &[&["P1", "Gold", "Summer", "300", "45000", "DJ and lights"]],
            )
            .with_table("Buffet_Options", &["Package_ID", "Level_Name", "Price", "Items"], &[])
            .with_table("Extras", &["Item_Name", "Category", "Price"], &[&["Zaffa", "Show", "3000"]])
            .with_table(
                "Bookings",
                BOOKING_HEADERS,
                &[&["10/04/2026", "night", "Pending", "Old Client", "01011111111", "P1", "", "", ""]],
            ),
    );
    set_facts(&store, "1001234567");

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
    let tools = Arc::new(venue_tools(knowledge.clone(), checker, recorder));
    let sessions = Arc::new(InMemorySessionStore::with_limits(
        100,
        Duration::from_secs(3600),
    ));

    let handler = MessageHandler::new(
        Arc::new(provider.clone()),
        tools,
        sessions.clone(),
        knowledge,
        clock,
        InstructionTemplate::new(
            "You are {agent_name}. Today is {today}. Admin: {admin_phone}.\n{knowledge_base}",
        ),
        &agent,
    );

    Fixture {
        store,
        provider,
        sessions,
        handler,
    }
}

fn fixture(provider: MockProvider) -> Fixture {
    fixture_with(provider, AgentConfig::default())
}

fn sid(id: &str) -> SessionId {
    SessionId(id.to_string())
}

fn function_response(part: &ChatPart) -> (&str, &serde_json::Value) {
    match part {
        ChatPart::FunctionResponse { name, response } => (name.as_str(), response),
        other => panic!("expected a function response, got {other:?}"),
    }
}

#[tokio::test]
async fn first_message_seeds_instruction_with_knowledge() {
    let fx = fixture(MockProvider::with_replies(&["أهلاً بك"]));

    let reply = fx.handler.handle("مرحبا", &sid("user-1")).await;
    assert_eq!(reply, "أهلاً بك");

    let requests = fx.provider.requests().await;
    assert_eq!(requests.len(), 1);
    let instruction = &requests[0].system_instruction;
    assert!(instruction.starts_with("You are Nour. Today is 2026-03-01. Admin: 01001234567."));
    assert!(instruction.contains("--- PACKAGES ---"));
    assert!(instruction.contains("Gold"));
    assert!(instruction.contains("Zaffa"));

    let names: Vec<&str> = requests[0].functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["book_date", "check_availability", "get_general_info"]);
}

#[tokio::test]
async fn history_accumulates_within_a_conversation() {
    let fx = fixture(MockProvider::with_replies(&["first", "second"]));

    fx.handler.handle("one", &sid("user-1")).await;
    fx.handler.handle("two", &sid("user-1")).await;

    let requests = fx.provider.requests().await;
    let roles: Vec<Role> = requests[1].turns.iter().map(|t| t.role).collect();
    assert_eq!(roles, [Role::User, Role::Model, Role::User]);
    assert_eq!(requests[1].turns[2].text(), "two");
    assert_eq!(requests[0].system_instruction, requests[1].system_instruction);
}

#[tokio::test]
async fn identities_get_separate_conversations() {
    let fx = fixture(MockProvider::with_replies(&["a", "b"]));

    fx.handler.handle("hello", &sid("user-1")).await;
    fx.handler.handle("hello", &sid("user-2")).await;

    let requests = fx.provider.requests().await;
    assert_eq!(requests[1].turns.len(), 1);
    assert_eq!(fx.sessions.count().await, 2);
}

#[tokio::test]
async fn availability_tool_round_trip() {
    let provider = MockProvider::new();
    provider
        .push(ChatResponse::call(
            "check_availability",
            json!({"date_str": "2026-04-10", "time_slot": "Night"}),
        ))
        .await;
    provider
        .push(ChatResponse::text("للأسف هذا الموعد محجوز"))
        .await;
    let fx = fixture(provider);

    let reply = fx.handler.handle("هل ١٠ أبريل بالليل متاح؟", &sid("user-1")).await;
    assert_eq!(reply, "للأسف هذا الموعد محجوز");

    let requests = fx.provider.requests().await;
    assert_eq!(requests.len(), 2);
    let last = requests[1].turns.last().unwrap();
    assert_eq!(last.role, Role::Tool);
    let (name, response) = function_response(&last.parts[0]);
    assert_eq!(name, "check_availability");
    assert_eq!(response, &json!({"result": "Booked"}));
}

#[tokio::test]
async fn booking_tool_appends_row_and_reports_deposit() {
    let provider = MockProvider::new();
    provider
        .push(ChatResponse::call(
            "book_date",
            json!({
                "date_str": "2026-03-02",
                "time_slot": "night",
                "name": "Ahmed Mohamed Ali",
                "phone": "01012345678",
                "package_name": "Gold",
                "total_price": 48000,
                "details_summary": "Gold + Zaffa"
            }),
        ))
        .await;
    provider.push(ChatResponse::text("تم الحجز")).await;
    let fx = fixture(provider);

    let reply = fx.handler.handle("أؤكد الحجز", &sid("user-1")).await;
    assert_eq!(reply, "تم الحجز");
    assert_eq!(fx.store.append_count(), 1);

    let appended = fx.store.raw_rows("Bookings").pop().unwrap();
    assert_eq!(appended[0], "2026-03-02");
    assert_eq!(appended[1], "Night");
    assert_eq!(appended[2], "Pending");
    assert_eq!(appended[6], "48000");

    let requests = fx.provider.requests().await;
    let (_, response) = function_response(&requests[1].turns.last().unwrap().parts[0]);
    assert_eq!(
        response["result"],
        "SUCCESS: Booking recorded. Total Deal: 48000. Deposit Required: 5000 EGP within 48 hours."
    );
}

#[tokio::test]
async fn booking_today_is_refused_without_appending() {
    let provider = MockProvider::new();
    provider
        .push(ChatResponse::call(
            "book_date",
            json!({
                "date_str": "2026-03-01",
                "time_slot": "Day",
                "name": "Ahmed Mohamed Ali",
                "phone": "01012345678",
                "package_name": "Gold",
                "total_price": "45000"
            }),
        ))
        .await;
    provider.push(ChatResponse::text("choose another date")).await;
    let fx = fixture(provider);

    fx.handler.handle("book today", &sid("user-1")).await;
    assert_eq!(fx.store.append_count(), 0);

    let requests = fx.provider.requests().await;
    let (_, response) = function_response(&requests[1].turns.last().unwrap().parts[0]);
    assert!(response["result"].as_str().unwrap().contains("PAST_DATE"));
}

#[tokio::test]
async fn bad_tool_arguments_are_reported_to_the_model() {
    let provider = MockProvider::new();
    provider
        .push(ChatResponse::call("book_date", json!({"date_str": "2026-04-10"})))
        .await;
    provider.push(ChatResponse::text("I need more details")).await;
    let fx = fixture(provider);

    let reply = fx.handler.handle("book it", &sid("user-1")).await;
    assert_eq!(reply, "I need more details");
    assert_eq!(fx.store.append_count(), 0);

    let requests = fx.provider.requests().await;
    let (_, response) = function_response(&requests[1].turns.last().unwrap().parts[0]);
    assert!(
        response["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid arguments for book_date")
    );
}

#[tokio::test]
async fn unknown_tool_is_reported_to_the_model() {
    let provider = MockProvider::new();
    provider
        .push(ChatResponse::call("cancel_booking", json!({})))
        .await;
    provider.push(ChatResponse::text("I cannot cancel")).await;
    let fx = fixture(provider);

    let reply = fx.handler.handle("cancel", &sid("user-1")).await;
    assert_eq!(reply, "I cannot cancel");

    let requests = fx.provider.requests().await;
    let (name, response) = function_response(&requests[1].turns.last().unwrap().parts[0]);
    assert_eq!(name, "cancel_booking");
    assert_eq!(response, &json!({"error": "unknown tool `cancel_booking`"}));
}

#[tokio::test]
#[traced_test]
async fn model_error_evicts_session_and_apologizes() {
    let provider = MockProvider::with_replies(&["hello"]);
    let fx = fixture(provider);

    fx.handler.handle("hi", &sid("user-1")).await;
    assert_eq!(fx.sessions.count().await, 1);

    fx.provider.push_error("quota exceeded").await;
    let reply = fx.handler.handle("again", &sid("user-1")).await;
    assert_eq!(reply, AgentConfig::default().error_reply);
    assert_eq!(fx.sessions.count().await, 0);
    assert!(logs_contain("conversation failed, evicting session"));

    // The next message starts a new conversation from scratch.
    fx.handler.handle("third", &sid("user-1")).await;
    let requests = fx.provider.requests().await;
    assert_eq!(requests.last().unwrap().turns.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn new_conversation_after_error_sees_fresh_knowledge() {
    let fx = fixture(MockProvider::with_replies(&["hello"]));
    fx.handler.handle("hi", &sid("user-1")).await;

    set_facts(&fx.store, "1009999999");
    tokio::time::advance(Duration::from_secs(61)).await;

    // Same conversation keeps its seeded snapshot.
    fx.handler.handle("still there?", &sid("user-1")).await;
    let requests = fx.provider.requests().await;
    assert!(requests[1].system_instruction.contains("01001234567"));

    fx.provider.push_error("boom").await;
    fx.handler.handle("fail", &sid("user-1")).await;

    fx.handler.handle("fresh start", &sid("user-1")).await;
    let requests = fx.provider.requests().await;
    let last = requests.last().unwrap();
    assert!(last.system_instruction.contains("01009999999"));
    assert!(!last.system_instruction.contains("01001234567"));
}

#[tokio::test]
async fn empty_model_reply_is_an_error() {
    let fx = fixture(MockProvider::with_replies(&["   "]));
    let reply = fx.handler.handle("hi", &sid("user-1")).await;
    assert_eq!(reply, AgentConfig::default().error_reply);
    assert_eq!(fx.sessions.count().await, 0);
}

#[tokio::test]
async fn tool_loop_is_bounded() {
    let provider = MockProvider::new();
    for _ in 0..5 {
        provider
            .push(ChatResponse::call("get_general_info", json!({"key": "Admin_Phone"})))
            .await;
    }
    let agent = AgentConfig {
        max_tool_iterations: 3,
        ..AgentConfig::default()
    };
    let fx = fixture_with(provider, agent);

    let reply = fx.handler.handle("phone?", &sid("user-1")).await;
    assert_eq!(reply, AgentConfig::default().error_reply);
    assert_eq!(fx.provider.call_count().await, 3);
    assert_eq!(fx.sessions.count().await, 0);
}

#[tokio::test]
async fn fact_tool_applies_phone_fixup() {
    let provider = MockProvider::new();
    provider
        .push(ChatResponse::call("get_general_info", json!({"key": "Admin_Phone"})))
        .await;
    provider.push(ChatResponse::text("done")).await;
    let fx = fixture(provider);

    fx.handler.handle("phone?", &sid("user-1")).await;
    let requests = fx.provider.requests().await;
    let (_, response) = function_response(&requests[1].turns.last().unwrap().parts[0]);
    assert_eq!(response["result"], "01001234567");
}
