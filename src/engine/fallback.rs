//! Locally synthesized responses used when the game service cannot be
//! reached. Output is seeded from the request so the same situation yields
//! the same text, and every payload is tagged `is_fallback`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::engine::store::POTION_HEAL;
use crate::model::api::{
    CombatAction, CombatRequest, CombatResponse, CombatRewards, InitializeRequest,
    InitializeResponse, StoryRequest, StoryResponse,
};
use crate::model::item::{Item, ItemType};
use crate::model::quest::{Objective, Quest, QuestReward};
use crate::model::story::StoryEvent;

/// How many recent story events feed the seed.
const SEED_HISTORY: usize = 3;

const OPENINGS: [&str; 5] = [
    "The path ahead twists into shadow.",
    "A cold wind carries the smell of rain and smoke.",
    "Somewhere nearby, water drips onto stone.",
    "The silence here feels deliberate, as if something is listening.",
    "Faded markings on the wall hint at travellers long gone.",
];

const DETAILS: [&str; 5] = [
    "You steady your breath and press on.",
    "Your instincts tell you to stay alert.",
    "A faint light flickers in the distance.",
    "Footprints in the dust suggest you are not alone.",
    "The way back is still open, for now.",
];

const CHOICES: [&str; 6] = [
    "Press forward carefully",
    "Search the surroundings",
    "Rest for a moment",
    "Call out into the darkness",
    "Double back and take another route",
    "Check your gear",
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// FNV-1a, continued from `hash`. Stable across builds and platforms.
fn fnv1a64(hash: u64, bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(hash, |h, b| (h ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

fn seed_for(choice: &str, history: &[StoryEvent]) -> u64 {
    let mut hash = fnv1a64(FNV_OFFSET, choice.as_bytes());
    for event in history.iter().rev().take(SEED_HISTORY) {
        // 0xff never occurs in UTF-8, so it cleanly separates the texts.
        hash = fnv1a64(hash, &[0xff]);
        hash = fnv1a64(hash, event.text.as_bytes());
    }
    hash
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn pick_choices(rng: &mut StdRng, count: usize) -> Vec<String> {
    CHOICES
        .choose_multiple(rng, count)
        .map(|c| c.to_string())
        .collect()
}

pub fn story(request: &StoryRequest) -> StoryResponse {
    let mut rng = StdRng::seed_from_u64(seed_for(&request.choice, &request.previous_events));

    let choice = request.choice.trim();
    let lead = if choice.is_empty() {
        String::new()
    } else {
        format!("You decide to {}. ", choice.to_lowercase())
    };
    let story = format!(
        "{lead}{} {}",
        pick(&mut rng, &OPENINGS),
        pick(&mut rng, &DETAILS)
    );

    StoryResponse {
        story,
        choices: pick_choices(&mut rng, 3),
        is_fallback: true,
        ..Default::default()
    }
}

pub fn initialize(request: &InitializeRequest) -> InitializeResponse {
    let seed_text = format!("{}:{}", request.player.name, request.genre);
    let mut rng = StdRng::seed_from_u64(seed_for(&seed_text, &[]));

    let story = format!(
        "{}, a {:?} of some renown, arrives at the edge of an unfamiliar {} land. {}",
        request.player.name,
        request.player.class,
        request.genre,
        pick(&mut rng, &OPENINGS)
    );

    InitializeResponse {
        story,
        quest: Some(Quest {
            id: "quest_first_steps".into(),
            title: "First Steps".into(),
            description: "Find shelter and learn where you are.".into(),
            objectives: vec![
                Objective { text: "Explore the area".into(), completed: false },
                Objective { text: "Find a safe place to rest".into(), completed: false },
            ],
            progress: 0,
            reward: QuestReward { xp: 50, coins: 20, items: Vec::new() },
        }),
        items: vec![Item::new("health_potion", "Health Potion", ItemType::Potion)
            .with_quantity(2)
            .with_price(20)],
        choices: pick_choices(&mut rng, 3),
        location: Some("Crossroads".into()),
        is_fallback: true,
    }
}

/// A simple local resolution so a fight can continue offline.
pub fn combat(request: &CombatRequest) -> CombatResponse {
    let seed_text = format!(
        "{}:{}:{}:{:?}",
        request.enemy.id, request.enemy.health, request.player.health, request.action
    );
    let mut rng = StdRng::seed_from_u64(seed_for(&seed_text, &[]));

    let player = &request.player;
    let enemy = &request.enemy;
    let strength_bonus = u32::try_from(player.stats.strength.max(0) / 5).unwrap_or(0);
    let enemy_hit = rng.gen_range(0..=enemy.attack.max(1));

    let mut log = Vec::new();
    let mut player_health = player.health;
    let (damage_dealt, damage_taken, escaped) = match request.action {
        CombatAction::Attack => {
            let dealt = (rng.gen_range(5..=12) + strength_bonus).saturating_sub(enemy.defense);
            log.push(format!("You strike the {} for {dealt} damage.", enemy.name));
            (dealt, enemy_hit, false)
        }
        CombatAction::Defend => {
            log.push("You raise your guard.".to_string());
            (0, enemy_hit / 2, false)
        }
        CombatAction::UseItem => {
            player_health = player_health.saturating_add(POTION_HEAL).min(player.max_health);
            log.push("You use an item.".to_string());
            (0, enemy_hit, false)
        }
        CombatAction::Run => {
            let escaped = rng.gen_bool(0.5);
            if escaped {
                log.push(format!("You escape from the {}.", enemy.name));
                (0, 0, true)
            } else {
                log.push("You fail to escape!".to_string());
                (0, enemy_hit, false)
            }
        }
    };

    let enemy_health = enemy.health.saturating_sub(damage_dealt);
    let victory = enemy_health == 0;
    let taken = if victory { 0 } else { damage_taken };
    player_health = player_health.saturating_sub(taken);
    if taken > 0 {
        log.push(format!("The {} hits you for {taken} damage.", enemy.name));
    }

    let rewards = victory.then(|| CombatRewards {
        xp: enemy.level.max(1) * 10 + 10,
        coins: rng.gen_range(5..=15),
        items: Vec::new(),
    });
    if victory {
        log.push(format!("The {} is defeated!", enemy.name));
    }

    CombatResponse {
        damage_dealt,
        damage_taken: taken,
        player_health: Some(player_health),
        enemy_health: Some(enemy_health),
        combat_log: log,
        victory,
        defeat: player_health == 0,
        escaped,
        rewards,
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::GameStore;
    use crate::model::enemy::Enemy;
    use crate::model::player::{CharacterClass, NewCharacter};
    use crate::model::story::StoryEventType;

    fn story_request(choice: &str) -> StoryRequest {
        let mut store = GameStore::new();
        store.create_character(NewCharacter {
            name: "Iris".into(),
            class: CharacterClass::Mage,
            gender: String::new(),
        });
        StoryRequest {
            player: store.player().cloned().unwrap(),
            genre: "fantasy".into(),
            previous_events: Vec::new(),
            choice: choice.into(),
            game_state: Default::default(),
            active_quest: None,
            current_location: None,
            language: "en".into(),
        }
    }

    #[test]
    fn same_request_same_story() {
        let a = story(&story_request("Open the door"));
        let b = story(&story_request("Open the door"));
        assert_eq!(a.story, b.story);
        assert_eq!(a.choices, b.choices);
        assert!(a.is_fallback);
        assert_eq!(a.choices.len(), 3);
        assert!(a.story.starts_with("You decide to open the door."));
    }

    #[test]
    fn seed_is_plain_fnv1a() {
        assert_eq!(seed_for("", &[]), FNV_OFFSET);
        assert_eq!(seed_for("a", &[]), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(seed_for("foobar", &[]), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn seed_follows_recent_history() {
        let old = StoryEvent::new("The bridge sways.", StoryEventType::Story);
        let recent = StoryEvent::new("A crow calls.", StoryEventType::Story);

        let base = seed_for("Wait", &[]);
        let with_history = seed_for("Wait", &[old.clone(), recent.clone()]);
        assert_ne!(base, with_history);
        assert_eq!(with_history, seed_for("Wait", &[old.clone(), recent.clone()]));
        assert_ne!(with_history, seed_for("Wait", &[recent, old]));
    }

    #[test]
    fn combat_fallback_respects_bounds() {
        let request = story_request("");
        let combat_request = CombatRequest {
            player: request.player,
            enemy: Enemy {
                id: "rat".into(),
                name: "Rat".into(),
                health: 1,
                max_health: 10,
                level: 1,
                attack: 2,
                defense: 0,
                description: String::new(),
            },
            action: CombatAction::Attack,
            item_id: None,
        };
        let resp = combat(&combat_request);
        assert!(resp.victory);
        assert_eq!(resp.enemy_health, Some(0));
        assert_eq!(resp.damage_taken, 0);
        assert!(resp.rewards.is_some());
        assert!(resp.is_fallback);
    }
}
