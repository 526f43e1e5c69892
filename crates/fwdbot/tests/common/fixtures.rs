//! Update fixtures and a dispatcher wired to an in-memory store

#![allow(dead_code)]

use std::sync::Arc;

use fwdcore::{ActorId, Gatekeeper, MemoryStore};
use fwdgate::Dispatcher;
use serde_json::{json, Value};
use teloxide::types::Update;

pub const OWNER: ActorId = ActorId(858877317);
pub const OWNER_USERNAME: &str = "@boss";
pub const BOT_USERNAME: &str = "fwdgate_bot";

/// Dispatcher plus direct access to the store behind it
pub struct TestEnvironment {
    pub store: Arc<MemoryStore>,
    pub dispatcher: Arc<Dispatcher>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let gatekeeper = Arc::new(Gatekeeper::new(OWNER, store.clone()));
        let dispatcher = Arc::new(Dispatcher::new(
            gatekeeper,
            OWNER_USERNAME,
            Some(BOT_USERNAME.to_string()),
        ));
        Self { store, dispatcher }
    }
}

pub fn user_json(id: u64, first_name: &str, username: Option<&str>) -> Value {
    let mut user = json!({"id": id, "is_bot": false, "first_name": first_name});
    if let Some(username) = username {
        user["username"] = json!(username);
    }
    user
}

fn private_chat(user: &Value) -> Value {
    json!({"id": user["id"], "type": "private", "first_name": user["first_name"]})
}

/// Private text message from `from`.
pub fn text_update(update_id: u32, from: Value, text: &str) -> Update {
    serde_json::from_str(&json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1700000000,
            "chat": private_chat(&from),
            "from": from,
            "text": text
        }
    })
    .to_string())
    .expect("valid message update")
}

/// `/start` sent in a private chat.
pub fn start_update(update_id: u32, from: Value) -> Update {
    serde_json::from_str(&json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1700000000,
            "chat": private_chat(&from),
            "from": from,
            "text": "/start",
            "entities": [{"type": "bot_command", "offset": 0, "length": 6}]
        }
    })
    .to_string())
    .expect("valid start update")
}

/// Button press; `message` is the `(chat, message_id)` the button was attached to.
pub fn callback_update(update_id: u32, from: Value, data: &str, message: Option<(i64, i32)>) -> Update {
    let mut query = json!({
        "id": format!("cbq-{}", update_id),
        "from": from,
        "chat_instance": "4242",
        "data": data
    });
    if let Some((chat, message_id)) = message {
        query["message"] = json!({
            "message_id": message_id,
            "date": 1700000000,
            "chat": {"id": chat, "type": "private", "first_name": "Chat"},
            "from": {"id": 4242, "is_bot": true, "first_name": "fwdgate", "username": BOT_USERNAME},
            "text": "👤 New membership request"
        });
    }
    serde_json::from_str(&json!({"update_id": update_id, "callback_query": query}).to_string())
        .expect("valid callback update")
}
