use serde_json::{Value, json};
use txpanel_api::{ActionHistoryEntry, ActionKind, PlayerModalSuccess, PlayerSnapshot};

/// History entry by `author` at ts 1_700_000_000, permanent, not revoked.
pub fn entry(id: &str, kind: ActionKind) -> ActionHistoryEntry {
    ActionHistoryEntry {
        id: id.to_string(),
        kind,
        reason: "test reason".to_string(),
        author: "author".to_string(),
        ts: 1_700_000_000,
        exp: None,
        revoked_by: None,
        revoked_at: None,
    }
}

/// Registered, connected player on net id 7, not whitelisted.
pub fn player(name: &str) -> PlayerSnapshot {
    PlayerSnapshot {
        display_name: name.to_string(),
        pure_name: name.to_lowercase(),
        netid: Some(7),
        license: Some(format!("{name}-license")),
        is_registered: true,
        is_connected: true,
        ids: vec![format!("license:{name}-license")],
        hwids: Vec::new(),
        old_ids: None,
        old_hwids: None,
        session_time: Some(42),
        play_time: Some(1_500),
        ts_joined: Some(1_690_000_000),
        ts_last_connection: Some(1_700_000_000),
        ts_whitelisted: None,
        notes: None,
        notes_log: None,
        action_history: Vec::new(),
    }
}

/// `GET /player` success body for `player`.
pub fn player_payload(player: &PlayerSnapshot, server_time: i64) -> Value {
    serde_json::to_value(PlayerModalSuccess {
        server_time,
        player: player.clone(),
    })
    .unwrap_or_else(|e| json!({ "error": e.to_string() }))
}

pub fn ok_payload() -> Value {
    json!({ "success": true })
}

pub fn error_payload(message: &str) -> Value {
    json!({ "error": message })
}
