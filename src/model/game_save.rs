use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::codex::Codex;
use crate::model::engagement::{Badge, Cameo, Challenge, CollectionSet, Milestone, ProgressionStats};
use crate::model::enemy::Enemy;
use crate::model::game_state::GameState;
use crate::model::player::Player;
use crate::model::quest::Quest;
use crate::model::story::StoryEvent;

/// Schema version written alongside every persisted payload.
pub const SAVE_VERSION: u32 = 2;

/// The persisted shape of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub version: u32,
    pub player: Option<Player>,
    pub current_enemy: Option<Enemy>,
    pub story_events: Vec<StoryEvent>,
    pub current_choices: Vec<String>,
    pub current_location: Option<String>,
    pub game_state: GameState,
    pub quests: Vec<Quest>,
    pub completed_quests: Vec<Quest>,
    pub abandoned_quests: u32,
    pub player_score: u32,
    pub badges: Vec<Badge>,
    pub codex: Codex,
    pub learned_recipes: Vec<String>,
    pub milestones: Vec<Milestone>,
    pub collections: Vec<CollectionSet>,
    pub challenges: Vec<Challenge>,
    pub progression: ProgressionStats,
    pub cameos: Vec<Cameo>,
    pub genre: String,
    pub language: String,
}

/// Body of `POST /api/save`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub player_id: String,
    pub save_name: String,
    pub version: u32,
    pub state: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveAck {
    pub save_id: String,
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveSummary {
    pub id: String,
    pub name: String,
    pub player_name: String,
    pub level: u32,
    pub version: u32,
    pub updated_at: Option<String>,
}

/// A loaded save as returned by the backend, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSave {
    pub id: Option<String>,
    pub name: Option<String>,
    pub version: u32,
    pub state: Value,
}

impl LoadedSave {
    /// Accepts both `{ id, name, version, state: {...} }` and a bare state
    /// object.
    pub fn from_body(body: Value) -> Self {
        let id = body
            .get("id")
            .or_else(|| body.get("saveId"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let name = body.get("name").and_then(Value::as_str).map(str::to_string);
        let version = body
            .get("version")
            .and_then(Value::as_u64)
            .map(|v| v as u32)
            .unwrap_or(1);

        let state = match body.get("state") {
            Some(state) if state.is_object() => state.clone(),
            _ => body,
        };

        Self { id, name, version, state }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRequest {
    pub name: String,
}
