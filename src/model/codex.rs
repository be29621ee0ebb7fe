use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodexCategory {
    Enemies,
    Locations,
    Items,
    Npcs,
    Lore,
}

impl CodexCategory {
    pub const ALL: [CodexCategory; 5] = [
        CodexCategory::Enemies,
        CodexCategory::Locations,
        CodexCategory::Items,
        CodexCategory::Npcs,
        CodexCategory::Lore,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Enemies => "enemies",
            Self::Locations => "locations",
            Self::Items => "items",
            Self::Npcs => "npcs",
            Self::Lore => "lore",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
    #[serde(default = "one")]
    pub times_encountered: u32,
    pub discovered_at: DateTime<Utc>,
}

fn one() -> u32 {
    1
}

/// Discovery journal. All five categories are always present; entries are
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codex {
    pub enemies: BTreeMap<String, CodexEntry>,
    pub locations: BTreeMap<String, CodexEntry>,
    pub items: BTreeMap<String, CodexEntry>,
    pub npcs: BTreeMap<String, CodexEntry>,
    pub lore: BTreeMap<String, CodexEntry>,
}

impl Codex {
    pub fn category(&self, category: CodexCategory) -> &BTreeMap<String, CodexEntry> {
        match category {
            CodexCategory::Enemies => &self.enemies,
            CodexCategory::Locations => &self.locations,
            CodexCategory::Items => &self.items,
            CodexCategory::Npcs => &self.npcs,
            CodexCategory::Lore => &self.lore,
        }
    }

    pub fn category_mut(&mut self, category: CodexCategory) -> &mut BTreeMap<String, CodexEntry> {
        match category {
            CodexCategory::Enemies => &mut self.enemies,
            CodexCategory::Locations => &mut self.locations,
            CodexCategory::Items => &mut self.items,
            CodexCategory::Npcs => &mut self.npcs,
            CodexCategory::Lore => &mut self.lore,
        }
    }
}

/// A single discovery to record in the codex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub category: CodexCategory,
    pub id: String,
    pub name: String,
    pub description: String,
    pub stats: BTreeMap<String, i64>,
}
