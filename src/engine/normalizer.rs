//! Translation between the in-memory store and the persisted JSON shape.
//!
//! `serialize` trusts the store and writes everything. `deserialize` trusts
//! nothing: every field is checked on its own and either repaired with a
//! default or left out of the resulting patch.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::engine::store::{level_up_cascade, GameStore, StorePatch, STARTING_SCORE};
use crate::model::codex::{Codex, CodexCategory, CodexEntry};
use crate::model::enemy::Enemy;
use crate::model::engagement::ProgressionStats;
use crate::model::game_save::{SavePayload, SAVE_VERSION};
use crate::model::game_state::{GameState, StoryPhase};
use crate::model::item::{Item, ItemType, StatBonuses};
use crate::model::player::{
    Ability, CharacterClass, EquipSlot, EquippedItems, Player, Position, Stats,
};
use crate::model::story::{StoryEvent, StoryEventType};

pub const DEFAULT_LEVEL: u32 = 1;
pub const DEFAULT_HEALTH: u32 = 100;
pub const DEFAULT_XP_CAP: u32 = 100;
pub const DEFAULT_MANA: u32 = 50;
pub const DEFAULT_DUNGEON_LEVEL: u32 = 1;
pub const DEFAULT_PLAYER_NAME: &str = "Adventurer";

/// Keys that mark an object as an item record rather than a stat block.
const ITEM_MARKERS: [&str; 5] = ["id", "name", "type", "effect", "quantity"];

/* =========================
   Serialize
   ========================= */

pub fn to_payload(store: &GameStore) -> SavePayload {
    SavePayload {
        version: SAVE_VERSION,
        player: store.player.clone(),
        current_enemy: store.current_enemy.clone(),
        story_events: store.story_events.clone(),
        current_choices: store.current_choices.clone(),
        current_location: store.current_location.clone(),
        game_state: store.game_state.clone(),
        quests: store.quests.clone(),
        completed_quests: store.completed_quests.clone(),
        abandoned_quests: store.abandoned_quests,
        player_score: store.player_score,
        badges: store.badges.clone(),
        codex: store.codex.clone(),
        learned_recipes: store.learned_recipes.clone(),
        milestones: store.milestones.clone(),
        collections: store.collections.clone(),
        challenges: store.challenges.clone(),
        progression: store.progression.clone(),
        cameos: store.cameos.clone(),
        genre: store.genre.clone(),
        language: store.language.clone(),
    }
}

/// Plain JSON snapshot of every persisted field. Never fails.
pub fn serialize(store: &GameStore) -> Value {
    // The payload holds only strings, integers, bools and maps with string
    // keys, so conversion cannot fail.
    serde_json::to_value(to_payload(store)).unwrap_or(Value::Null)
}

/* =========================
   Deserialize
   ========================= */

/// Builds a store patch from untrusted JSON. Absent fields stay `None`.
pub fn deserialize(raw: &Value) -> StorePatch {
    let Some(obj) = raw.as_object() else {
        debug!("saved state is not an object, nothing to restore");
        return StorePatch::default();
    };

    StorePatch {
        player: obj.get("player").map(|v| {
            if v.is_null() {
                None
            } else {
                repair_player(v)
            }
        }),
        current_enemy: obj.get("currentEnemy").map(repair_enemy),
        story_events: obj
            .get("storyEvents")
            .map(|v| repaired_list(v, repair_story_event)),
        current_choices: obj.get("currentChoices").map(list_of),
        current_location: obj
            .get("currentLocation")
            .map(|v| v.as_str().map(str::to_string)),
        game_state: obj.get("gameState").map(repair_game_state),
        quests: obj.get("quests").map(list_of),
        completed_quests: obj.get("completedQuests").map(list_of),
        abandoned_quests: obj.get("abandonedQuests").map(|v| u32_or(Some(v), 0)),
        player_score: obj
            .get("playerScore")
            .map(|v| u32_or(Some(v), STARTING_SCORE)),
        badges: obj.get("badges").map(list_of),
        codex: obj.get("codex").map(repair_codex),
        learned_recipes: obj.get("learnedRecipes").map(list_of),
        milestones: obj.get("milestones").map(list_of),
        collections: obj.get("collections").map(list_of),
        challenges: obj.get("challenges").map(list_of),
        progression: obj.get("progression").map(|v| {
            serde_json::from_value::<ProgressionStats>(v.clone()).unwrap_or_default()
        }),
        cameos: obj.get("cameos").map(list_of),
        genre: obj
            .get("genre")
            .and_then(Value::as_str)
            .map(str::to_string),
        language: obj
            .get("language")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// `deserialize` merged onto `store`.
pub fn restore(store: &mut GameStore, raw: &Value) {
    store.apply_patch(deserialize(raw));
}

/// Rebuilds a player field by field. Returns `None` only when the value is
/// not an object at all.
fn repair_player(raw: &Value) -> Option<Player> {
    let Some(obj) = raw.as_object() else {
        debug!("player is not an object, dropped");
        return None;
    };

    let max_health = u32_or(obj.get("maxHealth"), DEFAULT_HEALTH);
    let max_mana = u32_or(obj.get("maxMana"), DEFAULT_MANA);

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_PLAYER_NAME)
        .to_string();

    let mut player = Player {
        name,
        class: obj
            .get("class")
            .and_then(Value::as_str)
            .and_then(CharacterClass::parse)
            .unwrap_or(CharacterClass::Warrior),
        gender: obj
            .get("gender")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        level: u32_or(obj.get("level"), DEFAULT_LEVEL).max(1),
        health: u32_or(obj.get("health"), max_health).min(max_health),
        max_health,
        xp: u32_or(obj.get("xp"), 0),
        max_xp: u32_or(obj.get("maxXp"), DEFAULT_XP_CAP).max(1),
        mana: u32_or(obj.get("mana"), max_mana).min(max_mana),
        max_mana,
        coins: u32_or(obj.get("coins"), 0),
        dungeon_level: u32_or(obj.get("dungeonLevel"), DEFAULT_DUNGEON_LEVEL),
        position: repair_position(obj.get("position")),
        inventory: repair_inventory(obj.get("inventory")),
        equipped_items: repair_equipped(obj.get("equippedItems")),
        stats: repair_stats(obj.get("stats")),
        abilities: repair_abilities(obj.get("abilities")),
    };

    // A save written mid-cascade can hold xp past the cap.
    let gained = level_up_cascade(&mut player);
    if gained > 0 {
        debug!(gained, "loaded xp was over the cap, levels applied");
    }
    Some(player)
}

/// Accepts only a numeric `{strength, intelligence, agility}` block. An
/// item-shaped object (a known corruption of older saves) or anything
/// else becomes the default 10/10/10.
fn repair_stats(raw: Option<&Value>) -> Stats {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return Stats::default();
    };
    if ITEM_MARKERS.iter().any(|k| obj.contains_key(*k)) {
        debug!("stats looked like an item record, reset to defaults");
        return Stats::default();
    }

    let stat = |key: &str| i32_of(obj.get(key));
    match (stat("strength"), stat("intelligence"), stat("agility")) {
        (Some(strength), Some(intelligence), Some(agility)) => Stats {
            strength,
            intelligence,
            agility,
        },
        _ => Stats::default(),
    }
}

fn repair_position(raw: Option<&Value>) -> Position {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return Position::default();
    };
    let coord = |key: &str| i32_of(obj.get(key)).unwrap_or(0);
    Position { x: coord("x"), y: coord("y") }
}

/// Keeps entries with an id and a non-zero quantity, collapsing duplicate
/// ids.
fn repair_inventory(raw: Option<&Value>) -> Vec<Item> {
    let mut inventory: Vec<Item> = Vec::new();
    for item in raw.map(|v| repaired_list(v, repair_item)).unwrap_or_default() {
        if item.quantity == 0 {
            continue;
        }
        match inventory.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => inventory.push(item),
        }
    }
    inventory
}

/// Field-by-field item decode. Only a missing or blank `id` drops the entry.
fn repair_item(raw: &Value) -> Option<Item> {
    let obj = raw.as_object()?;
    let id = obj.get("id").and_then(string_of).filter(|id| !id.trim().is_empty())?;
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());

    Some(Item {
        name,
        item_type: decoded(obj.get("type")).unwrap_or(ItemType::Misc),
        quantity: u32_or(obj.get("quantity"), 1),
        description: obj
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        stat_bonuses: obj
            .get("statBonuses")
            .and_then(Value::as_object)
            .map(|b| StatBonuses {
                strength: i32_of(b.get("strength")).unwrap_or(0),
                intelligence: i32_of(b.get("intelligence")).unwrap_or(0),
                agility: i32_of(b.get("agility")).unwrap_or(0),
            }),
        slot: decoded(obj.get("slot")),
        rarity: decoded(obj.get("rarity")).unwrap_or_default(),
        price: u32_or(obj.get("price"), 0),
        id,
    })
}

/// `null` or an unusable record clears the enemy.
fn repair_enemy(raw: &Value) -> Option<Enemy> {
    let obj = raw.as_object()?;
    let name = obj.get("name").and_then(Value::as_str).map(str::to_string);
    let id = obj.get("id").and_then(string_of).or_else(|| name.clone())?;
    let max_health = u32_or(obj.get("maxHealth"), u32_or(obj.get("health"), 1)).max(1);

    Some(Enemy {
        name: name.unwrap_or_else(|| id.clone()),
        health: u32_or(obj.get("health"), max_health).min(max_health),
        max_health,
        level: u32_or(obj.get("level"), DEFAULT_LEVEL),
        attack: u32_or(obj.get("attack"), 0),
        defense: u32_or(obj.get("defense"), 0),
        description: obj
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        id,
    })
}

/// Keeps any event that has text. Missing ids are regenerated, unknown
/// types become `Other` and timestamps may be RFC 3339 or epoch millis.
fn repair_story_event(raw: &Value) -> Option<StoryEvent> {
    let obj = raw.as_object()?;
    let text = obj.get("text").and_then(Value::as_str)?.to_string();
    Some(StoryEvent {
        id: obj
            .get("id")
            .and_then(string_of)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        text,
        timestamp: timestamp_of(obj.get("timestamp")),
        event_type: match obj.get("type") {
            Some(Value::String(_)) => decoded(obj.get("type")).unwrap_or(StoryEventType::Other),
            _ => StoryEventType::Story,
        },
    })
}

fn repair_equipped(raw: Option<&Value>) -> EquippedItems {
    let mut equipped = EquippedItems::default();
    let Some(obj) = raw.and_then(Value::as_object) else {
        return equipped;
    };
    for slot in EquipSlot::ALL {
        let key = serde_json::to_value(slot)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        *equipped.slot_mut(slot) = obj.get(&key).and_then(Value::as_str).map(str::to_string);
    }
    equipped
}

fn repair_abilities(raw: Option<&Value>) -> BTreeMap<String, Ability> {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return BTreeMap::new();
    };
    obj.iter()
        .filter_map(|(id, v)| {
            let ability = serde_json::from_value::<Ability>(v.clone()).ok()?;
            Some((id.clone(), ability))
        })
        .collect()
}

/// Every category is always present in the result.
fn repair_codex(raw: &Value) -> Codex {
    let mut codex = Codex::default();
    let Some(obj) = raw.as_object() else {
        return codex;
    };
    for category in CodexCategory::ALL {
        let entries = obj
            .get(category.key())
            .and_then(Value::as_object)
            .map(entries_of)
            .unwrap_or_default();
        *codex.category_mut(category) = entries;
    }
    codex
}

fn entries_of(obj: &Map<String, Value>) -> BTreeMap<String, CodexEntry> {
    obj.iter()
        .filter_map(|(id, v)| Some((id.clone(), repair_codex_entry(id, v)?)))
        .collect()
}

/// Any object is kept; the name falls back to the entry id.
fn repair_codex_entry(id: &str, raw: &Value) -> Option<CodexEntry> {
    let obj = raw.as_object()?;
    let stats: BTreeMap<String, i64> = obj
        .get("stats")
        .and_then(Value::as_object)
        .map(|stats| {
            stats
                .iter()
                .filter_map(|(k, v)| Some((k.clone(), i64_of(Some(v))?)))
                .collect()
        })
        .unwrap_or_default();

    Some(CodexEntry {
        name: obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(id)
            .to_string(),
        description: obj
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        stats,
        times_encountered: u32_or(obj.get("timesEncountered"), 1).max(1),
        discovered_at: timestamp_of(obj.get("discoveredAt")),
    })
}

fn repair_game_state(raw: &Value) -> GameState {
    let Some(obj) = raw.as_object() else {
        return GameState::default();
    };
    let flag = |key: &str| obj.get(key).and_then(Value::as_bool).unwrap_or(false);

    GameState {
        turn_count: u32_or(obj.get("turnCount"), 0),
        story_phase: obj
            .get("storyPhase")
            .and_then(|v| serde_json::from_value::<StoryPhase>(v.clone()).ok())
            .unwrap_or_default(),
        combat_encounters: u32_or(obj.get("combatEncounters"), 0),
        combat_escapes: u32_or(obj.get("combatEscapes"), 0),
        is_after_combat: flag("isAfterCombat"),
        is_final_phase: flag("isFinalPhase"),
        is_initialized: flag("isInitialized"),
    }
}

/// Any finite JSON number, rounded down.
fn whole_number(raw: Option<&Value>) -> Option<f64> {
    raw.and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(f64::floor)
}

/// Numbers are floored and clamped into range; anything that is not a
/// number becomes `default`.
fn u32_or(raw: Option<&Value>, default: u32) -> u32 {
    whole_number(raw)
        .map(|v| v.clamp(0.0, f64::from(u32::MAX)) as u32)
        .unwrap_or(default)
}

fn i32_of(raw: Option<&Value>) -> Option<i32> {
    whole_number(raw).map(|v| v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
}

fn i64_of(raw: Option<&Value>) -> Option<i64> {
    raw.and_then(Value::as_i64)
        .or_else(|| whole_number(raw).map(|v| v as i64))
}

fn string_of(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decoded<T: DeserializeOwned>(raw: Option<&Value>) -> Option<T> {
    raw.and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// RFC 3339 text or epoch milliseconds. Anything else is stamped now.
fn timestamp_of(raw: Option<&Value>) -> DateTime<Utc> {
    let parsed = match raw {
        Some(Value::String(text)) => DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                text.trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
            }),
        Some(v @ Value::Number(_)) => {
            i64_of(Some(v)).and_then(DateTime::<Utc>::from_timestamp_millis)
        }
        _ => None,
    };
    parsed.unwrap_or_else(Utc::now)
}

/// Like [`list_of`] but with a repair function per element.
fn repaired_list<T>(raw: &Value, repair: fn(&Value) -> Option<T>) -> Vec<T> {
    raw.as_array()
        .map(|items| items.iter().filter_map(repair).collect())
        .unwrap_or_default()
}

/// Decodes each element on its own, dropping the ones that do not fit. A
/// non-array becomes an empty list.
fn list_of<T: DeserializeOwned>(raw: &Value) -> Vec<T> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::codex::Discovery;
    use crate::model::engagement::Badge;
    use crate::model::game_state::{GameStatePatch, PhaseEvent};
    use crate::model::item::ItemType;
    use crate::model::player::NewCharacter;
    use crate::model::quest::{Objective, Quest, QuestReward};
    use crate::model::story::StoryEventType;
    use chrono::Utc;
    use serde_json::json;

    fn restored(raw: Value) -> GameStore {
        let mut store = GameStore::new();
        restore(&mut store, &raw);
        store
    }

    #[test]
    fn bare_player_gets_every_default() {
        let store = restored(json!({ "player": { "name": "X", "class": "Warrior" } }));
        let player = store.player().unwrap();

        assert_eq!(player.name, "X");
        assert_eq!(player.class, CharacterClass::Warrior);
        assert_eq!(player.stats, Stats { strength: 10, intelligence: 10, agility: 10 });
        assert_eq!(player.coins, 0);
        assert!(player.inventory.is_empty());
        assert_eq!(player.equipped_items, EquippedItems::default());
        assert!(player.abilities.is_empty());
        assert_eq!(player.level, 1);
        assert_eq!(player.health, 100);
        assert_eq!(player.max_health, 100);
        assert_eq!(player.xp, 0);
        assert_eq!(player.max_xp, 100);
        assert_eq!(player.dungeon_level, 1);
        assert_eq!(player.position, Position { x: 0, y: 0 });
    }

    #[test]
    fn item_shaped_stats_are_replaced() {
        let store = restored(json!({
            "player": {
                "name": "X",
                "class": "Mage",
                "stats": { "id": "item_1", "name": "Sword", "type": "weapon", "quantity": 1 }
            }
        }));
        assert_eq!(store.player().unwrap().stats, Stats::default());
    }

    #[test]
    fn partial_stats_fall_back_to_defaults() {
        let store = restored(json!({
            "player": { "name": "X", "class": "Rogue", "stats": { "strength": 30 } }
        }));
        assert_eq!(store.player().unwrap().stats, Stats::default());
    }

    #[test]
    fn wrong_types_are_repaired() {
        let store = restored(json!({
            "player": {
                "name": "X",
                "class": "Rogue",
                "coins": "lots",
                "inventory": { "not": "a list" },
                "equippedItems": "sword",
                "abilities": [1, 2],
                "level": -3,
                "health": 500,
                "maxHealth": 80,
                "position": 7
            },
            "playerScore": "high",
            "abandonedQuests": null,
            "learnedRecipes": "recipe_iron_sword"
        }));
        let player = store.player().unwrap();
        assert_eq!(player.coins, 0);
        assert!(player.inventory.is_empty());
        assert_eq!(player.equipped_items, EquippedItems::default());
        assert!(player.abilities.is_empty());
        assert_eq!(player.level, 1);
        assert_eq!(player.health, 80);
        assert_eq!(player.position, Position::default());
        assert_eq!(store.player_score(), 100);
        assert_eq!(store.abandoned_quests(), 0);
        assert!(store.learned_recipes().is_empty());
    }

    #[test]
    fn inventory_drops_bad_entries_and_merges_duplicates() {
        let store = restored(json!({
            "player": {
                "name": "X",
                "class": "Warrior",
                "inventory": [
                    { "id": "herb", "name": "Herb", "type": "material", "quantity": 2 },
                    { "id": "herb", "name": "Herb", "type": "material", "quantity": 1 },
                    { "id": "ghost", "name": "Ghost", "type": "misc", "quantity": 0 },
                    "junk"
                ]
            }
        }));
        let inventory = &store.player().unwrap().inventory;
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].quantity, 3);
    }

    #[test]
    fn fractional_numbers_are_floored_not_discarded() {
        let store = restored(json!({
            "player": {
                "name": "X",
                "class": "Warrior",
                "maxXp": 337.5,
                "health": 87.5,
                "maxHealth": 120,
                "coins": 12.5,
                "stats": { "strength": 12.0, "intelligence": 8.7, "agility": 15 },
                "position": { "x": -2.5, "y": 3.9 },
                "inventory": [
                    { "id": "amulet", "name": "Amulet", "type": "accessory", "price": 19.99 },
                    { "id": "herb", "quantity": 2.0 }
                ]
            },
            "playerScore": 140.8
        }));
        let player = store.player().unwrap();
        assert_eq!(player.max_xp, 337);
        assert_eq!(player.health, 87);
        assert_eq!(player.coins, 12);
        assert_eq!(player.stats, Stats { strength: 12, intelligence: 8, agility: 15 });
        assert_eq!(player.position, Position { x: -3, y: 3 });
        assert_eq!(player.inventory.len(), 2);
        assert_eq!(player.inventory[0].price, 19);
        assert_eq!(player.inventory[1].name, "herb");
        assert_eq!(player.inventory[1].item_type, ItemType::Misc);
        assert_eq!(player.inventory[1].quantity, 2);
        assert_eq!(store.player_score(), 140);
    }

    #[test]
    fn enemy_with_fractional_health_is_kept() {
        let store = restored(json!({
            "currentEnemy": { "id": "wolf", "name": "Wolf", "health": 12.5, "maxHealth": 20 }
        }));
        let enemy = store.current_enemy().unwrap();
        assert_eq!(enemy.health, 12);
        assert_eq!(enemy.max_health, 20);
        assert_eq!(enemy.level, 1);

        let cleared = restored(json!({ "currentEnemy": null }));
        assert!(cleared.current_enemy().is_none());
    }

    #[test]
    fn legacy_events_and_codex_entries_survive() {
        let store = restored(json!({
            "storyEvents": [
                { "id": "e1", "text": "The gate opens.", "timestamp": 1_700_000_000_000_i64, "type": "story" },
                { "id": 7, "text": "The guard nods.", "timestamp": "2024-01-02T03:04:05Z", "type": "dialogue" },
                { "text": "No stamp at all." },
                { "id": "e4" }
            ],
            "codex": {
                "enemies": {
                    "wolf": { "name": "Wolf", "stats": { "attack": 4.5, "note": "fast" } }
                }
            }
        }));

        let events = store.story_events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0].timestamp,
            DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap()
        );
        assert_eq!(events[1].id, "7");
        assert_eq!(events[1].event_type, StoryEventType::Other);
        assert_eq!(events[1].timestamp.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert_eq!(events[2].event_type, StoryEventType::Story);
        assert!(!events[2].id.is_empty());

        let wolf = &store.codex().category(CodexCategory::Enemies)["wolf"];
        assert_eq!(wolf.name, "Wolf");
        assert_eq!(wolf.times_encountered, 1);
        assert_eq!(wolf.stats, BTreeMap::from([("attack".to_string(), 4)]));
    }

    #[test]
    fn loaded_xp_over_cap_is_levelled() {
        let store = restored(json!({
            "player": { "name": "X", "class": "Mage", "level": 1, "xp": 250, "maxXp": 100 }
        }));
        let player = store.player().unwrap();
        assert_eq!(player.level, 3);
        assert_eq!(player.xp, 0);
        assert_eq!(player.max_xp, 225);
        assert!(player.xp < player.max_xp);
    }

    #[test]
    fn huge_loaded_caps_do_not_overflow() {
        let mut store = restored(json!({
            "player": { "name": "X", "class": "Warrior", "maxXp": 2_000_000_000_u32, "xp": 0 }
        }));
        store.gain_xp(2_000_000_000);

        let player = store.player().unwrap();
        assert_eq!(player.level, 2);
        assert_eq!(player.max_xp, 3_000_000_000);
    }

    #[test]
    fn codex_always_has_all_categories() {
        let codex = repair_codex(&json!({ "enemies": "oops" }));
        for category in CodexCategory::ALL {
            assert!(codex.category(category).is_empty());
        }

        let value = serde_json::to_value(&codex).unwrap();
        for category in CodexCategory::ALL {
            assert!(value.get(category.key()).is_some());
        }
    }

    #[test]
    fn absent_fields_keep_current_values() {
        let mut store = GameStore::new();
        store.add_score(25);
        store.learn_recipe("recipe_iron_sword");

        restore(&mut store, &json!({ "abandonedQuests": 2 }));
        assert_eq!(store.player_score(), 125);
        assert_eq!(store.learned_recipes(), ["recipe_iron_sword".to_string()]);
        assert_eq!(store.abandoned_quests(), 2);
    }

    #[test]
    fn non_object_input_changes_nothing() {
        let mut store = GameStore::new();
        restore(&mut store, &json!([1, 2, 3]));
        assert_eq!(store, GameStore::new());
    }

    #[test]
    fn full_store_round_trips() {
        let mut store = GameStore::new();
        store.create_character(NewCharacter {
            name: "Brom".into(),
            class: CharacterClass::Warrior,
            gender: "male".into(),
        });
        store.add_item(
            Item::new("iron_sword", "Iron Sword", ItemType::Weapon)
                .with_slot(EquipSlot::Weapon)
                .with_price(60),
        );
        store.equip_item("iron_sword");
        store.add_quest(Quest {
            id: "q_crypt".into(),
            title: "The Crypt".into(),
            description: "Something stirs below.".into(),
            objectives: vec![Objective { text: "Enter".into(), completed: true }],
            progress: 40,
            reward: QuestReward { xp: 50, coins: 10, items: vec![] },
        });
        store.discover(Discovery {
            category: CodexCategory::Enemies,
            id: "wolf".into(),
            name: "Wolf".into(),
            description: "Hungry.".into(),
            stats: BTreeMap::from([("attack".to_string(), 4)]),
        });
        store.unlock_badge(Badge {
            id: "first_steps".into(),
            title: "First Steps".into(),
            description: "Began the journey".into(),
            icon: "boot".into(),
            earned_at: Utc::now(),
        });
        store.add_story_event("You wake in a cold cell.", StoryEventType::Story);
        store.gain_xp(130);
        store.set_choices(vec!["Open the door".into(), "Wait".into()]);
        store.set_location(Some("Cellblock".into()));
        store.update_game_state(GameStatePatch {
            turn_count: Some(3),
            is_initialized: Some(true),
            ..Default::default()
        });
        store.advance_phase(PhaseEvent::EnemyEncountered);
        store.learn_recipe("recipe_iron_sword");

        let saved = serialize(&store);
        let text = serde_json::to_string(&saved).unwrap();
        let reloaded: Value = serde_json::from_str(&text).unwrap();

        let mut fresh = GameStore::new();
        restore(&mut fresh, &reloaded);
        assert_eq!(fresh, store);
        assert_eq!(serialize(&fresh), saved);
    }

    #[test]
    fn serialized_payload_carries_version_and_fields() {
        let value = serialize(&GameStore::new());
        let obj = value.as_object().unwrap();
        assert_eq!(obj["version"], json!(SAVE_VERSION));
        for key in [
            "player",
            "storyEvents",
            "gameState",
            "quests",
            "completedQuests",
            "abandonedQuests",
            "playerScore",
            "badges",
            "codex",
            "learnedRecipes",
            "milestones",
            "collections",
            "challenges",
            "progression",
            "cameos",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }
}
