//! Integration tests for the webhook server and the update pipeline
//!
//! Run with: cargo test -p fwdgate --test webhook_test

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{callback_update, start_update, user_json, Call, RecordingMessenger, TestEnvironment, OWNER};
use fwdcore::ActorId;
use fwdgate::telegram::menu;
use fwdgate::telegram::webhook::ALIVE;
use fwdgate::telegram::{router, spawn_pipeline, Messenger, UpdateQueue};
use pretty_assertions::assert_eq;
use teloxide::types::{ChatId, MessageId};
use tower::ServiceExt;

async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn post(path: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn start_json() -> String {
    serde_json::json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "date": 1700000000,
            "chat": {"id": 111, "type": "private", "first_name": "Ali"},
            "from": {"id": 111, "is_bot": false, "first_name": "Ali", "username": "ali"},
            "text": "/start",
            "entities": [{"type": "bot_command", "offset": 0, "length": 6}]
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_webhook_enqueues_update() {
    let (queue, mut updates) = UpdateQueue::new(8);
    let app = router(queue, "/webhook");

    let (status, body) = call(app, post("/webhook", start_json())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let update = updates.try_recv().unwrap();
    assert_eq!(update.id.0, 1);
}

#[tokio::test]
async fn test_webhook_acknowledges_garbage() {
    let (queue, mut updates) = UpdateQueue::new(8);
    let app = router(queue, "/webhook");

    for body in ["", "not json", "{\"update_id\": \"x\"}", "[]"] {
        let (status, text) = call(app.clone(), post("/webhook", body)).await;
        assert_eq!(status, StatusCode::OK, "body {:?}", body);
        assert_eq!(text, "OK");
    }
    assert!(updates.try_recv().is_err());
}

#[tokio::test]
async fn test_webhook_acknowledges_oversized_body() {
    let (queue, mut updates) = UpdateQueue::new(8);
    let app = router(queue, "/webhook");

    // Above axum's default 2 MB body limit
    let (status, body) = call(app, post("/webhook", vec![b' '; 3 * 1024 * 1024])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
    assert!(updates.try_recv().is_err());
}

#[tokio::test]
async fn test_webhook_acknowledges_when_worker_is_gone() {
    let (queue, updates) = UpdateQueue::new(8);
    drop(updates);
    let app = router(queue, "/webhook");

    let (status, body) = call(app, post("/webhook", start_json())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_liveness_endpoints() {
    let (queue, _updates) = UpdateQueue::new(8);
    let app = router(queue, "/hook/secret");

    for path in ["/", "/health"] {
        let (status, body) = call(app.clone(), get(path)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, ALIVE);
    }

    // Ingestion lives only on the configured path
    let (status, _) = call(app.clone(), post("/webhook", start_json())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(app, post("/hook/secret", start_json())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_pipeline_delivers_in_order() {
    let env = TestEnvironment::new();
    let recorder = RecordingMessenger::new();
    let messenger: Arc<dyn Messenger> = recorder.clone();
    let (queue, worker) = spawn_pipeline(env.dispatcher.clone(), messenger);

    let ali = user_json(111, "Ali", Some("ali"));
    let owner = user_json(OWNER.0, "Boss", None);
    assert!(queue.submit(start_update(1, ali)).await);
    assert!(
        queue
            .submit(callback_update(2, owner, "accept:111", Some((OWNER.0 as i64, 40))))
            .await
    );

    // Closing the queue drains it
    drop(queue);
    worker.await.unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 5);
    assert!(matches!(&calls[0], Call::Send { chat, keyboard: Some(_), .. } if *chat == ChatId(OWNER.0 as i64)));
    assert_eq!(
        calls[1],
        Call::Send {
            chat: ChatId(111),
            text: menu::REQUEST_PENDING.to_string(),
            keyboard: None,
        }
    );
    assert_eq!(calls[2], Call::Answer);
    assert_eq!(
        calls[3],
        Call::Send {
            chat: ChatId(111),
            text: menu::REQUEST_APPROVED.to_string(),
            keyboard: None,
        }
    );
    assert_eq!(
        calls[4],
        Call::Edit {
            chat: ChatId(OWNER.0 as i64),
            message: MessageId(40),
            text: "✅ User @ali was added".to_string(),
        }
    );
    assert!(env.store.peek().unwrap().is_member(ActorId(111)));
}

#[tokio::test]
async fn test_failed_ack_does_not_block_reply() {
    let env = TestEnvironment::new();
    let recorder = RecordingMessenger::new();
    recorder.fail_answers();
    let messenger: Arc<dyn Messenger> = recorder.clone();
    let (queue, worker) = spawn_pipeline(env.dispatcher.clone(), messenger);

    queue
        .submit(callback_update(1, user_json(111, "Ali", None), "help", Some((111, 2))))
        .await;
    drop(queue);
    worker.await.unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], Call::Answer);
    assert!(matches!(&calls[1], Call::Send { chat, .. } if *chat == ChatId(111)));
}
