use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub earned_at: DateTime<Utc>,
}

/// Another player's character appearing in this session through an invite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cameo {
    pub id: String,
    pub player_name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub target: u32,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub achieved_at: Option<DateTime<Utc>>,
}

impl Milestone {
    pub fn is_achieved(&self) -> bool {
        self.achieved_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSet {
    pub id: String,
    pub name: String,
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub collected: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub reward_coins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub target: u32,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub reward_coins: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressionStats {
    pub enemies_defeated: u32,
    pub quests_completed: u32,
    pub items_crafted: u32,
    pub puzzles_solved: u32,
    pub coins_earned: u32,
    pub deaths: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionEvent {
    EnemyDefeated,
    QuestCompleted,
    ItemCrafted,
    PuzzleSolved,
    CoinsEarned(u32),
    Died,
}

impl ProgressionStats {
    pub fn record(&mut self, event: ProgressionEvent) {
        match event {
            ProgressionEvent::EnemyDefeated => self.enemies_defeated += 1,
            ProgressionEvent::QuestCompleted => self.quests_completed += 1,
            ProgressionEvent::ItemCrafted => self.items_crafted += 1,
            ProgressionEvent::PuzzleSolved => self.puzzles_solved += 1,
            ProgressionEvent::CoinsEarned(amount) => {
                self.coins_earned = self.coins_earned.saturating_add(amount)
            }
            ProgressionEvent::Died => self.deaths += 1,
        }
    }
}
