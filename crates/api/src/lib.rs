//! Wire types for the player endpoints of the txpanel web API.
//!
//! Every endpoint answers with either its success shape or `{"error": "..."}`.
//! The success shapes live here; the error shape is [`ErrorBody`] and is
//! detected by the client before the success shape is decoded.

use serde::{Deserialize, Serialize};

// ─── Paths ───────────────────────────────────────────────────────────────────

pub const PLAYER_PATH: &str = "/player";
pub const SAVE_NOTE_PATH: &str = "/player/save_note";
pub const WHITELIST_PATH: &str = "/player/whitelist";
pub const BAN_PATH: &str = "/player/ban";
pub const REVOKE_ACTION_PATH: &str = "/history/revoke_action";

// ─── Player reference ────────────────────────────────────────────────────────

/// Key set identifying a player for every player-scoped call.
///
/// Online players are addressed by the server mutex and their net id,
/// offline (database) players by their license identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum PlayerRef {
    Server { mutex: String, netid: u32 },
    License { license: String },
}

impl PlayerRef {
    pub fn server(mutex: impl Into<String>, netid: u32) -> Self {
        Self::Server {
            mutex: mutex.into(),
            netid,
        }
    }

    pub fn license(license: impl Into<String>) -> Self {
        Self::License {
            license: license.into(),
        }
    }

    /// Query parameters sent with every player-scoped request.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::Server { mutex, netid } => vec![
                ("mutex".to_string(), mutex.clone()),
                ("netid".to_string(), netid.to_string()),
            ],
            Self::License { license } => vec![("license".to_string(), license.clone())],
        }
    }
}

impl std::fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server { mutex, netid } => write!(f, "{mutex}#{netid}"),
            Self::License { license } => write!(f, "license:{license}"),
        }
    }
}

// ─── Player snapshot ─────────────────────────────────────────────────────────

/// Kind of an action-history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Ban,
    Warn,
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ban => "ban",
            Self::Warn => "warn",
            Self::Other(kind) => kind,
        }
    }

    /// Capitalised label used in counters and lists.
    pub fn label(&self) -> &str {
        match self {
            Self::Ban => "Ban",
            Self::Warn => "Warn",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for ActionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ban" => Self::Ban,
            "warn" => Self::Warn,
            _ => Self::Other(value),
        }
    }
}

impl From<ActionKind> for String {
    fn from(value: ActionKind) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a player's action log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionHistoryEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub author: String,
    pub ts: i64,
    /// Expiration timestamp; `None` means permanent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<i64>,
}

impl ActionHistoryEntry {
    pub fn is_revoked(&self) -> bool {
        self.revoked_by.is_some()
    }
}

/// Full admin-relevant state of a player at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub display_name: String,
    #[serde(default)]
    pub pure_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default)]
    pub is_registered: bool,
    #[serde(default)]
    pub is_connected: bool,
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub hwids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_hwids: Option<Vec<String>>,
    /// Minutes connected in the current session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_time: Option<u64>,
    /// Total minutes played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_joined: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_last_connection: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_whitelisted: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_log: Option<String>,
    #[serde(default)]
    pub action_history: Vec<ActionHistoryEntry>,
}

impl PlayerSnapshot {
    pub fn is_whitelisted(&self) -> bool {
        self.ts_whitelisted.is_some()
    }
}

/// Success payload of `GET /player`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerModalSuccess {
    pub server_time: i64,
    pub player: PlayerSnapshot,
}

// ─── Mutations ───────────────────────────────────────────────────────────────

/// Success payload of every mutation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenericOk {
    pub success: bool,
}

/// The failure shape shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveNoteRequest {
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhitelistRequest {
    pub status: bool,
}

/// Ban request. `duration` is a preset such as `"2 hours"` or `"permanent"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BanRequest {
    pub reason: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevokeActionRequest {
    pub action_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn player_ref_query_pairs_match_variant() {
        let online = PlayerRef::server("abc", 7);
        assert_eq!(
            online.query_pairs(),
            vec![
                ("mutex".to_string(), "abc".to_string()),
                ("netid".to_string(), "7".to_string())
            ]
        );
        let offline = PlayerRef::license("9b1f");
        assert_eq!(
            offline.query_pairs(),
            vec![("license".to_string(), "9b1f".to_string())]
        );
    }

    #[test]
    fn player_ref_deserializes_untagged() {
        let r: PlayerRef = serde_json::from_value(json!({"mutex": "m", "netid": 3})).unwrap();
        assert_eq!(r, PlayerRef::server("m", 3));
        let r: PlayerRef = serde_json::from_value(json!({"license": "xyz"})).unwrap();
        assert_eq!(r, PlayerRef::license("xyz"));
    }

    #[test]
    fn unknown_action_kind_is_preserved() {
        let entry: ActionHistoryEntry = serde_json::from_value(json!({
            "id": "A1",
            "type": "kick",
            "reason": "afk",
            "author": "admin",
            "ts": 1_700_000_000
        }))
        .unwrap();
        assert_eq!(entry.kind, ActionKind::Other("kick".to_string()));
        assert!(!entry.is_revoked());
        assert_eq!(serde_json::to_value(&entry).unwrap()["type"], "kick");
    }

    #[test]
    fn snapshot_decodes_camel_case_with_defaults() {
        let resp: PlayerModalSuccess = serde_json::from_value(json!({
            "serverTime": 1_700_000_100,
            "player": {
                "displayName": "tabby",
                "isRegistered": true,
                "tsWhitelisted": 1_690_000_000,
                "actionHistory": [
                    {"id": "B1", "type": "ban", "reason": "cheat", "author": "a", "ts": 1}
                ]
            }
        }))
        .unwrap();
        assert_eq!(resp.player.display_name, "tabby");
        assert!(resp.player.is_whitelisted());
        assert!(resp.player.netid.is_none());
        assert_eq!(resp.player.action_history[0].kind, ActionKind::Ban);
    }

    #[test]
    fn revoke_request_uses_camel_case() {
        let body = serde_json::to_value(RevokeActionRequest {
            action_id: "W2".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"actionId": "W2"}));
    }
}
