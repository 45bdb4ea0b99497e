//! Integration tests for the webhook and REST endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The in-memory store and the recording transport
//! stand in for `PostgreSQL` and the Bot API, so every test exercises the
//! full dispatch path: dedup, passive accrual, command handling, and the
//! outbound messages.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use civbot_db::{GroupStore, MemoryGroupStore};
use civbot_server::router::build_router;
use civbot_server::state::AppState;
use civbot_telegram::{Outbound, RecordingTransport, Transport};
use civbot_types::ChatId;
use serde_json::Value;
use tower::ServiceExt;

const ART_BASE: &str = "https://img.example/city";

struct TestApp {
    router: Router,
    store: GroupStore,
    recorder: RecordingTransport,
}

fn make_test_app() -> TestApp {
    let store = GroupStore::Memory(MemoryGroupStore::new());
    let recorder = RecordingTransport::new();
    let state = Arc::new(AppState::new(
        store.clone(),
        Transport::Recording(recorder.clone()),
        String::from(ART_BASE),
    ));
    TestApp {
        router: build_router(state),
        store,
        recorder,
    }
}

/// Post one webhook update carrying a group message.
async fn send_message(
    app: &TestApp,
    update_id: i64,
    chat_id: i64,
    title: &str,
    text: &str,
) -> StatusCode {
    let body = serde_json::json!({
        "update_id": update_id,
        "message": {
            "chat": {"id": chat_id, "title": title, "type": "supergroup"},
            "text": text,
        }
    });
    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

/// All texts sent to one chat, in order.
fn texts_to(app: &TestApp, chat_id: i64) -> Vec<String> {
    let chat = ChatId::from(chat_id);
    app.recorder
        .sent()
        .into_iter()
        .filter_map(|outbound| match outbound {
            Outbound::Text { chat_id, text } if chat_id == chat => Some(text),
            _ => None,
        })
        .collect()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Webhook ingestion
// =========================================================================

#[tokio::test]
async fn plain_message_registers_the_group_and_accrues_one_brick() {
    let app = make_test_app();
    let status = send_message(&app, 1, -100, "Brick Layers", "good morning").await;
    assert_eq!(status, StatusCode::OK);

    let group = app
        .store
        .get_group(&ChatId::from(-100))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.name, "Brick Layers");
    assert_eq!(group.bricks, 1);
    // No command, no reply.
    assert!(app.recorder.sent().is_empty());
}

#[tokio::test]
async fn duplicate_update_ids_are_processed_once() {
    let app = make_test_app();
    send_message(&app, 7, -100, "Brick Layers", "hello").await;
    send_message(&app, 7, -100, "Brick Layers", "hello").await;
    send_message(&app, 8, -100, "Brick Layers", "hello").await;

    let group = app
        .store
        .get_group(&ChatId::from(-100))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.bricks, 2);
}

#[tokio::test]
async fn non_post_probes_are_acknowledged() {
    let app = make_test_app();
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/webhook").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn unparseable_bodies_are_acknowledged() {
    let app = make_test_app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/webhook")
                .body(Body::from("not an update"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
}

// =========================================================================
// Commands
// =========================================================================

#[tokio::test]
async fn start_confirms_with_the_group_title() {
    let app = make_test_app();
    send_message(&app, 1, -100, "Brick Layers", "/start").await;

    let texts = texts_to(&app, -100);
    assert_eq!(texts, vec!["🏰 Civilization started for *Brick Layers*"]);
}

#[tokio::test]
async fn city_sends_the_tier_art_with_a_status_caption() {
    let app = make_test_app();
    send_message(&app, 1, -100, "Brick Layers", "/city").await;

    let sent = app.recorder.sent();
    assert_eq!(sent.len(), 1);
    let Some(Outbound::Photo {
        photo_url, caption, ..
    }) = sent.first()
    else {
        panic!("expected a photo, got {sent:?}");
    };
    // One brick accrued by the command message itself: still a camp.
    assert_eq!(photo_url, &format!("{ART_BASE}/Camp.jpg"));
    assert!(caption.contains("Brick Layers"));
    assert!(caption.contains("⛺ Camp"));
    assert!(caption.contains("Bricks: *1*"));
}

#[tokio::test]
async fn top_lists_groups_by_bricks_descending() {
    let app = make_test_app();
    let alpha = ChatId::from(-1);
    let beta = ChatId::from(-2);
    app.store.accrue_passive(&alpha, "Alpha", 50, 0).await.unwrap();
    app.store.accrue_passive(&beta, "Beta", 900, 0).await.unwrap();

    send_message(&app, 1, -1, "Alpha", "/top").await;

    let texts = texts_to(&app, -1);
    assert_eq!(texts.len(), 1);
    let board = &texts[0];
    assert!(board.starts_with("🏆 *Top Cities*"));
    assert!(board.contains("1. *Beta*"));
    // Alpha earned one brick from the /top message itself.
    assert!(board.contains("2. *Alpha* — 51 🧱"));
}

#[tokio::test]
async fn accrual_applies_before_the_command_it_rides_on() {
    let app = make_test_app();
    let chat = ChatId::from(-100);
    // One brick short of a market; the command message covers it.
    app.store
        .accrue_passive(&chat, "Brick Layers", 499, 0)
        .await
        .unwrap();

    send_message(&app, 1, -100, "Brick Layers", "/buy market").await;

    let group = app.store.get_group(&chat).await.unwrap().unwrap();
    assert_eq!(group.bricks, 0);
    assert_eq!(group.markets, 1);
    let texts = texts_to(&app, -100);
    assert_eq!(texts, vec!["✅ Market Built! (+2 income)"]);
}

#[tokio::test]
async fn buy_without_an_item_shows_the_shop_menu() {
    let app = make_test_app();
    send_message(&app, 1, -100, "Brick Layers", "/buy").await;

    let texts = texts_to(&app, -100);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("🛒 *Marketplace*"));
    assert!(texts[0].contains("/buy market"));
    assert!(texts[0].contains("/buy wall"));
}

#[tokio::test]
async fn underfunded_purchase_reports_the_shortfall() {
    let app = make_test_app();
    send_message(&app, 1, -100, "Brick Layers", "/buy market").await;

    let texts = texts_to(&app, -100);
    assert_eq!(texts, vec!["❌ Need 500 bricks. Have: 1"]);
}

#[tokio::test]
async fn second_wall_is_refused() {
    let app = make_test_app();
    let chat = ChatId::from(-100);
    app.store
        .accrue_passive(&chat, "Brick Layers", 5000, 0)
        .await
        .unwrap();
    app.store.try_buy_wall(&chat, 1000).await.unwrap();

    send_message(&app, 1, -100, "Brick Layers", "/buy wall").await;

    let texts = texts_to(&app, -100);
    assert_eq!(texts, vec!["❌ You already have a Wall!"]);
    let group = app.store.get_group(&chat).await.unwrap().unwrap();
    assert_eq!(group.walls, 1);
    assert_eq!(group.bricks, 4001);
}

// =========================================================================
// Raids
// =========================================================================

#[tokio::test]
async fn raid_steals_a_tenth_and_notifies_both_chats() {
    let app = make_test_app();
    let attacker = ChatId::from(-1);
    let defender = ChatId::from(-2);
    app.store.accrue_passive(&attacker, "Alpha", 120, 0).await.unwrap();
    app.store.accrue_passive(&defender, "Delta", 200, 0).await.unwrap();

    send_message(&app, 1, -1, "Alpha", "/attack -2").await;

    // Attacker: 120 seeded + 1 accrued + 20 stolen.
    let a = app.store.get_group(&attacker).await.unwrap().unwrap();
    let d = app.store.get_group(&defender).await.unwrap().unwrap();
    assert_eq!(a.bricks, 141);
    assert_eq!(d.bricks, 180);
    assert!(a.last_attack_at.is_some());

    assert_eq!(
        texts_to(&app, -1),
        vec!["⚔️ Victory! Stole 20 bricks from Delta!"]
    );
    assert_eq!(
        texts_to(&app, -2),
        vec!["⚠️ Attacked by Alpha! Lost 20 bricks."]
    );
}

#[tokio::test]
async fn walls_halve_the_steal() {
    let app = make_test_app();
    let attacker = ChatId::from(-1);
    let defender = ChatId::from(-2);
    app.store.accrue_passive(&attacker, "Alpha", 100, 0).await.unwrap();
    app.store.accrue_passive(&defender, "Delta", 1200, 0).await.unwrap();
    app.store.try_buy_wall(&defender, 1000).await.unwrap();

    send_message(&app, 1, -1, "Alpha", "/attack -2").await;

    // floor(200 / 10 / 2) = 10.
    let d = app.store.get_group(&defender).await.unwrap().unwrap();
    assert_eq!(d.bricks, 190);
    assert_eq!(
        texts_to(&app, -1),
        vec!["⚔️ Victory! Stole 10 bricks from Delta! (🛡️ Wall blocked 50%!)"]
    );
}

#[tokio::test]
async fn back_to_back_raids_hit_the_cooldown() {
    let app = make_test_app();
    app.store
        .accrue_passive(&ChatId::from(-1), "Alpha", 100, 0)
        .await
        .unwrap();
    app.store
        .accrue_passive(&ChatId::from(-2), "Delta", 200, 0)
        .await
        .unwrap();

    send_message(&app, 1, -1, "Alpha", "/attack -2").await;
    send_message(&app, 2, -1, "Alpha", "/attack -2").await;

    let texts = texts_to(&app, -1);
    assert_eq!(texts.len(), 2);
    assert!(texts[0].starts_with("⚔️ Victory!"));
    assert!(texts[1].starts_with("⌛ Wait "));
    assert!(texts[1].ends_with("s."));
}

#[tokio::test]
async fn raiding_an_empty_treasury_steals_nothing_and_skips_the_cooldown() {
    let app = make_test_app();
    let attacker = ChatId::from(-1);
    app.store.accrue_passive(&attacker, "Alpha", 100, 0).await.unwrap();
    app.store
        .upsert_group(&ChatId::from(-2), "Delta")
        .await
        .unwrap();

    send_message(&app, 1, -1, "Alpha", "/attack -2").await;

    assert_eq!(
        texts_to(&app, -1),
        vec!["🕸️ Delta has nothing to steal."]
    );
    let a = app.store.get_group(&attacker).await.unwrap().unwrap();
    assert!(a.last_attack_at.is_none());
}

#[tokio::test]
async fn self_attack_and_missing_targets_are_rejected() {
    let app = make_test_app();
    send_message(&app, 1, -1, "Alpha", "/attack -1").await;
    send_message(&app, 2, -1, "Alpha", "/attack").await;
    send_message(&app, 3, -1, "Alpha", "/attack -404").await;

    let texts = texts_to(&app, -1);
    assert_eq!(
        texts,
        vec![
            "❌ Cannot attack self.",
            "⚔️ Usage: `/attack <ID>`",
            "❌ Target not found.",
        ]
    );
}

// =========================================================================
// REST API
// =========================================================================

#[tokio::test]
async fn index_returns_html() {
    let app = make_test_app();
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn leaderboard_endpoint_orders_by_bricks() {
    let app = make_test_app();
    app.store
        .accrue_passive(&ChatId::from(-1), "Alpha", 50, 0)
        .await
        .unwrap();
    app.store
        .accrue_passive(&ChatId::from(-2), "Beta", 900, 0)
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/leaderboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json[0]["name"], "Beta");
    assert_eq!(json[0]["bricks"], 900);
    assert_eq!(json[1]["name"], "Alpha");
}

#[tokio::test]
async fn groups_endpoint_lists_everyone_by_bricks() {
    let app = make_test_app();
    app.store
        .accrue_passive(&ChatId::from(-1), "Alpha", 50, 0)
        .await
        .unwrap();
    app.store
        .accrue_passive(&ChatId::from(-2), "Beta", 900, 0)
        .await
        .unwrap();
    app.store
        .accrue_passive(&ChatId::from(-3), "Gamma", 5, 0)
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api/groups").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Beta", "Alpha", "Gamma"]);
}

#[tokio::test]
async fn brick_endpoint_validates_and_accrues() {
    let app = make_test_app();
    app.store
        .accrue_passive(&ChatId::from(-1), "Alpha", 10, 0)
        .await
        .unwrap();

    let missing = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/groups/brick")
                .header("content-type", "application/json")
                .body(Body::from(r#"{}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let unknown = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/groups/brick")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"id": "-404"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let ok = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/groups/brick")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"id": "-1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_to_json(ok.into_body()).await;
    assert_eq!(json["bricks"], 11);
}

#[tokio::test]
async fn raid_endpoint_resolves_and_maps_domain_errors() {
    let app = make_test_app();
    app.store
        .accrue_passive(&ChatId::from(-1), "Alpha", 100, 0)
        .await
        .unwrap();
    app.store
        .accrue_passive(&ChatId::from(-2), "Delta", 200, 0)
        .await
        .unwrap();

    let ok = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/groups/raid")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"attacker_id": "-1", "defender_id": "-2"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_to_json(ok.into_body()).await;
    assert_eq!(json["steal"], 20);
    assert_eq!(json["wall_reduced"], false);

    // Immediately raiding again trips the cooldown.
    let cooldown = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/groups/raid")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"attacker_id": "-1", "defender_id": "-2"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(cooldown.status(), StatusCode::TOO_MANY_REQUESTS);

    let self_raid = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/groups/raid")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"attacker_id": "-2", "defender_id": "-2"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(self_raid.status(), StatusCode::BAD_REQUEST);
}
