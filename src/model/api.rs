//! Request and response records for the game-service HTTP API.
//!
//! Response records default every optional field so that a sparse backend
//! payload still decodes. `is_fallback` is only ever set by the client when
//! it synthesizes a response locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::engagement::{Badge, Cameo};
use crate::model::enemy::Enemy;
use crate::model::game_state::{GameState, StoryPhase};
use crate::model::item::Item;
use crate::model::player::Player;
use crate::model::quest::Quest;
use crate::model::story::StoryEvent;

/* =========================
   Initialize
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    pub player: Player,
    pub genre: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeResponse {
    pub story: String,
    pub quest: Option<Quest>,
    pub items: Vec<Item>,
    pub choices: Vec<String>,
    pub location: Option<String>,
    pub is_fallback: bool,
}

/* =========================
   Story
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub player: Player,
    pub genre: String,
    pub previous_events: Vec<StoryEvent>,
    pub choice: String,
    pub game_state: GameState,
    pub active_quest: Option<Quest>,
    pub current_location: Option<String>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgressUpdate {
    pub quest_id: String,
    pub progress: u32,
    #[serde(default)]
    pub completed_objectives: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub location: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPuzzle {
    pub question: String,
    #[serde(default)]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryResponse {
    pub story: String,
    pub choices: Vec<String>,
    pub enemy: Option<Enemy>,
    pub puzzle: Option<StoryPuzzle>,
    pub quest_progress: Option<QuestProgressUpdate>,
    pub new_quest: Option<Quest>,
    pub badges: Vec<Badge>,
    pub scene: Option<Scene>,
    pub items: Vec<Item>,
    pub story_phase: Option<StoryPhase>,
    pub is_final_phase: bool,
    pub game_completed: bool,
    pub is_fallback: bool,
}

/* =========================
   Combat
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombatAction {
    Attack,
    Defend,
    UseItem,
    Run,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatRequest {
    pub player: Player,
    pub enemy: Enemy,
    pub action: CombatAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombatRewards {
    pub xp: u32,
    pub coins: u32,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombatResponse {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub player_health: Option<u32>,
    pub enemy_health: Option<u32>,
    pub combat_log: Vec<String>,
    pub victory: bool,
    pub defeat: bool,
    pub escaped: bool,
    pub rewards: Option<CombatRewards>,
    pub is_fallback: bool,
}

/* =========================
   Arcade puzzles
   ========================= */

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleStartRequest {
    pub player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PuzzleSession {
    pub session_id: String,
    pub puzzle_id: String,
    pub prompt: String,
    pub kind: String,
    pub max_attempts: u32,
    pub time_limit_secs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSubmitRequest {
    pub player_id: String,
    pub session_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PuzzleResult {
    pub correct: bool,
    pub score: u32,
    pub reward_coins: u32,
    pub attempts_remaining: u32,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PuzzleRecord {
    pub session_id: String,
    pub puzzle_id: String,
    pub solved: bool,
    pub score: u32,
    pub played_at: Option<DateTime<Utc>>,
}

/* =========================
   Cameo invites
   ========================= */

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameoInviteRequest {
    pub player_id: String,
    pub player_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameoInvite {
    pub invite_code: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameoAcceptRequest {
    pub invite_code: String,
    pub player_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameoAcceptResponse {
    pub cameo: Cameo,
}
