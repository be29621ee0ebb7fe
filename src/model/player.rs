use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
}

impl CharacterClass {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "warrior" => Some(Self::Warrior),
            "mage" => Some(Self::Mage),
            "rogue" => Some(Self::Rogue),
            _ => None,
        }
    }

    /// Starting numbers for a freshly created character of this class.
    pub fn starting_profile(self) -> ClassProfile {
        match self {
            Self::Warrior => ClassProfile {
                stats: Stats { strength: 15, intelligence: 5, agility: 10 },
                max_health: 120,
                max_mana: 30,
            },
            Self::Mage => ClassProfile {
                stats: Stats { strength: 5, intelligence: 15, agility: 10 },
                max_health: 80,
                max_mana: 100,
            },
            Self::Rogue => ClassProfile {
                stats: Stats { strength: 10, intelligence: 8, agility: 15 },
                max_health: 100,
                max_mana: 50,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassProfile {
    pub stats: Stats,
    pub max_health: u32,
    pub max_mana: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub strength: i32,
    pub intelligence: i32,
    pub agility: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self { strength: 10, intelligence: 10, agility: 10 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Helmet,
    Boots,
    Ring,
    Amulet,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 6] = [
        EquipSlot::Weapon,
        EquipSlot::Armor,
        EquipSlot::Helmet,
        EquipSlot::Boots,
        EquipSlot::Ring,
        EquipSlot::Amulet,
    ];
}

/// Slot → equipped item id. Every slot is always present, `None` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItems {
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub helmet: Option<String>,
    pub boots: Option<String>,
    pub ring: Option<String>,
    pub amulet: Option<String>,
}

impl EquippedItems {
    pub fn get(&self, slot: EquipSlot) -> Option<&str> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_deref(),
            EquipSlot::Armor => self.armor.as_deref(),
            EquipSlot::Helmet => self.helmet.as_deref(),
            EquipSlot::Boots => self.boots.as_deref(),
            EquipSlot::Ring => self.ring.as_deref(),
            EquipSlot::Amulet => self.amulet.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<String> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Helmet => &mut self.helmet,
            EquipSlot::Boots => &mut self.boots,
            EquipSlot::Ring => &mut self.ring,
            EquipSlot::Amulet => &mut self.amulet,
        }
    }

    /// Empties whichever slots currently hold `item_id`.
    pub fn clear_item(&mut self, item_id: &str) {
        for slot in EquipSlot::ALL {
            let entry = self.slot_mut(slot);
            if entry.as_deref() == Some(item_id) {
                *entry = None;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mana_cost: u32,
    #[serde(default)]
    pub damage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub class: CharacterClass,
    pub gender: String,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub xp: u32,
    pub max_xp: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub coins: u32,
    pub dungeon_level: u32,
    pub position: Position,
    pub inventory: Vec<Item>,
    pub equipped_items: EquippedItems,
    pub stats: Stats,
    pub abilities: BTreeMap<String, Ability>,
}

impl Player {
    pub fn find_item(&self, item_id: &str) -> Option<&Item> {
        self.inventory.iter().find(|i| i.id == item_id)
    }

    pub fn item_quantity(&self, item_id: &str) -> u32 {
        self.find_item(item_id).map_or(0, |i| i.quantity)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Fields supplied by the character-creation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    pub class: CharacterClass,
    pub gender: String,
}

/// Shallow partial update for [`Player`]. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<u32>,
    pub health: Option<u32>,
    pub max_health: Option<u32>,
    pub xp: Option<u32>,
    pub max_xp: Option<u32>,
    pub mana: Option<u32>,
    pub max_mana: Option<u32>,
    pub coins: Option<u32>,
    pub dungeon_level: Option<u32>,
    pub position: Option<Position>,
    pub stats: Option<Stats>,
}
