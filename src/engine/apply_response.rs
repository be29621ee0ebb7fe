//! Feeds game-service responses into the store.
//!
//! Each response is broken into effects (story text, an enemy, a quest
//! update, rewards...) and every effect is reported as applied, rejected
//! or deferred so the caller can surface what happened.

use std::collections::BTreeMap;

use crate::engine::store::GameStore;
use crate::model::api::{
    CameoAcceptResponse, CombatAction, CombatResponse, InitializeResponse, PuzzleResult,
    StoryResponse,
};
use crate::model::codex::{CodexCategory, Discovery};
use crate::model::engagement::ProgressionEvent;
use crate::model::enemy::Enemy;
use crate::model::event_result::ApplyReport;
use crate::model::game_state::{GameStatePatch, PhaseEvent, Screen, StoryPhase};
use crate::model::story::StoryEventType;

pub const VICTORY_SCORE: i64 = 10;
pub const COMPLETION_SCORE: i64 = 100;

fn slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn enemy_discovery(enemy: &Enemy) -> Discovery {
    let stats = BTreeMap::from([
        ("level".to_string(), i64::from(enemy.level)),
        ("maxHealth".to_string(), i64::from(enemy.max_health)),
        ("attack".to_string(), i64::from(enemy.attack)),
        ("defense".to_string(), i64::from(enemy.defense)),
    ]);
    Discovery {
        category: CodexCategory::Enemies,
        id: enemy.id.clone(),
        name: enemy.name.clone(),
        description: enemy.description.clone(),
        stats,
    }
}

fn enter_location(store: &mut GameStore, location: &str, description: &str) {
    store.set_location(Some(location.to_string()));
    store.discover(Discovery {
        category: CodexCategory::Locations,
        id: slug(location),
        name: location.to_string(),
        description: description.to_string(),
        stats: BTreeMap::new(),
    });
}

pub fn apply_initialize(store: &mut GameStore, resp: InitializeResponse) -> ApplyReport {
    let mut report = ApplyReport::default();

    if store.player().is_none() {
        report.rejected("initialize", "no character created");
        return report;
    }

    if resp.story.trim().is_empty() {
        report.rejected("story", "empty opening");
    } else {
        store.add_story_event(resp.story, StoryEventType::Story);
        report.applied("story");
    }

    if let Some(quest) = resp.quest {
        store.add_quest(quest);
        report.applied("quest");
    }

    for item in resp.items {
        let effect = format!("item:{}", item.id);
        store.add_item(item);
        report.applied(effect);
    }

    if let Some(location) = resp.location {
        enter_location(store, &location, "");
        report.applied("location");
    }

    store.set_choices(resp.choices);
    store.update_game_state(GameStatePatch {
        is_initialized: Some(true),
        story_phase: Some(StoryPhase::Exploration),
        ..Default::default()
    });
    store.set_screen(Screen::Story);

    report
}

pub fn apply_story(store: &mut GameStore, resp: StoryResponse) -> ApplyReport {
    let mut report = ApplyReport::default();

    if let Some(phase) = resp.story_phase {
        store.update_game_state(GameStatePatch {
            story_phase: Some(phase),
            ..Default::default()
        });
    }

    if resp.story.trim().is_empty() {
        report.rejected("story", "empty story text");
    } else {
        store.add_story_event(resp.story, StoryEventType::Story);
        report.applied("story");
    }

    if resp.choices.is_empty() {
        report.deferred("choices", "no choices offered");
    } else {
        store.set_choices(resp.choices);
        report.applied("choices");
    }

    let turn_count = store.game_state().turn_count + 1;
    store.update_game_state(GameStatePatch {
        turn_count: Some(turn_count),
        is_after_combat: Some(false),
        ..Default::default()
    });

    if let Some(scene) = resp.scene {
        enter_location(store, &scene.location, &scene.description);
        report.applied("scene");
    }

    if let Some(enemy) = resp.enemy {
        if enemy.health == 0 {
            report.rejected("enemy", format!("enemy '{}' arrived already defeated", enemy.id));
        } else {
            store.discover(enemy_discovery(&enemy));
            store.set_enemy(Some(enemy));
            let encounters = store.game_state().combat_encounters + 1;
            store.update_game_state(GameStatePatch {
                combat_encounters: Some(encounters),
                ..Default::default()
            });
            store.advance_phase(PhaseEvent::EnemyEncountered);
            store.set_screen(Screen::Combat);
            report.applied("enemy");
        }
    }

    if let Some(quest) = resp.new_quest {
        store.add_quest(quest);
        report.applied("new_quest");
    }

    if let Some(update) = resp.quest_progress {
        if store.quests().iter().any(|q| q.id == update.quest_id) {
            store.update_quest_progress(
                &update.quest_id,
                update.progress,
                &update.completed_objectives,
            );
            report.applied("quest_progress");
        } else {
            report.deferred(
                "quest_progress",
                format!("quest '{}' is not active", update.quest_id),
            );
        }
    }

    for badge in resp.badges {
        let effect = format!("badge:{}", badge.id);
        store.unlock_badge(badge);
        report.applied(effect);
    }

    for item in resp.items {
        let effect = format!("item:{}", item.id);
        store.add_item(item);
        report.applied(effect);
    }

    if let Some(puzzle) = resp.puzzle {
        store.add_story_event(puzzle.question, StoryEventType::Story);
    }
    if resp.is_final_phase && store.game_state().story_phase == StoryPhase::Exploration {
        store.advance_phase(PhaseEvent::FinalPuzzleReached);
        report.applied("final_phase");
    }

    if resp.game_completed {
        if store.game_state().story_phase == StoryPhase::FinalPuzzle {
            store.advance_phase(PhaseEvent::PuzzleSolved);
        } else {
            store.update_game_state(GameStatePatch {
                story_phase: Some(StoryPhase::Completed),
                is_final_phase: Some(true),
                ..Default::default()
            });
        }
        store.add_score(COMPLETION_SCORE);
        report.applied("game_completed");
    }

    report
}

pub fn apply_combat(
    store: &mut GameStore,
    action: CombatAction,
    item_id: Option<&str>,
    resp: CombatResponse,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    if store.current_enemy().is_none() {
        report.rejected("combat", "no enemy to fight");
        return report;
    }

    if let (CombatAction::UseItem, Some(item_id)) = (action, item_id) {
        store.use_item(item_id);
        report.applied("use_item");
    }

    for line in resp.combat_log {
        store.add_story_event(line, StoryEventType::Combat);
    }

    match resp.player_health {
        Some(health) => store.set_player_health(health),
        None => store.damage_player(resp.damage_taken),
    }
    match resp.enemy_health {
        Some(health) => store.set_enemy_health(health),
        None => store.damage_enemy(resp.damage_dealt),
    }

    let enemy_down = store.current_enemy().is_some_and(Enemy::is_defeated);
    let player_down = store.player().is_some_and(|p| !p.is_alive());

    if resp.victory || enemy_down {
        if let Some(rewards) = resp.rewards {
            store.add_coins(rewards.coins);
            for item in rewards.items {
                store.add_item(item);
            }
            store.gain_xp(rewards.xp);
        }
        store.record_progress(ProgressionEvent::EnemyDefeated);
        store.add_score(VICTORY_SCORE);
        leave_combat(store);
        report.applied("victory");
    } else if resp.defeat || player_down {
        store.set_player_health(0);
        store.record_progress(ProgressionEvent::Died);
        store.add_story_event("You have fallen.", StoryEventType::Combat);
        store.set_screen(Screen::GameOver);
        report.applied("defeat");
    } else if resp.escaped {
        let escapes = store.game_state().combat_escapes + 1;
        store.update_game_state(GameStatePatch {
            combat_escapes: Some(escapes),
            ..Default::default()
        });
        leave_combat(store);
        report.applied("escape");
    }

    report
}

fn leave_combat(store: &mut GameStore) {
    store.set_enemy(None);
    store.update_game_state(GameStatePatch {
        is_after_combat: Some(true),
        ..Default::default()
    });
    store.advance_phase(PhaseEvent::CombatEnded);
    store.set_screen(Screen::Story);
}

pub fn apply_puzzle_result(store: &mut GameStore, result: &PuzzleResult) -> ApplyReport {
    let mut report = ApplyReport::default();
    if !result.correct {
        report.deferred("puzzle_reward", "answer was not correct");
        return report;
    }
    store.add_coins(result.reward_coins);
    store.add_score(i64::from(result.score));
    store.record_progress(ProgressionEvent::PuzzleSolved);
    report.applied("puzzle_reward");
    report
}

pub fn apply_cameo(store: &mut GameStore, resp: CameoAcceptResponse) -> ApplyReport {
    let mut report = ApplyReport::default();
    let name = resp.cameo.player_name.clone();
    store.add_cameo(resp.cameo);
    store.add_story_event(format!("{name} joins your story."), StoryEventType::System);
    report.applied("cameo");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::api::{CombatRewards, QuestProgressUpdate, Scene};
    use crate::model::player::{CharacterClass, NewCharacter};
    use crate::model::quest::{Quest, QuestReward};

    fn started_store() -> GameStore {
        let mut store = GameStore::new();
        store.create_character(NewCharacter {
            name: "Lio".into(),
            class: CharacterClass::Rogue,
            gender: String::new(),
        });
        store
    }

    fn wolf(health: u32) -> Enemy {
        Enemy {
            id: "wolf".into(),
            name: "Wolf".into(),
            health,
            max_health: 30,
            level: 2,
            attack: 5,
            defense: 1,
            description: "Lean and hungry.".into(),
        }
    }

    #[test]
    fn story_with_enemy_enters_combat() {
        let mut store = started_store();
        let report = apply_story(
            &mut store,
            StoryResponse {
                story: "A wolf blocks the trail.".into(),
                choices: vec!["Fight".into(), "Run".into()],
                enemy: Some(wolf(30)),
                scene: Some(Scene { location: "Pine Trail".into(), description: String::new() }),
                ..Default::default()
            },
        );

        assert!(report.is_applied("enemy"));
        assert_eq!(store.screen(), Screen::Combat);
        assert_eq!(store.game_state().story_phase, StoryPhase::Combat);
        assert_eq!(store.game_state().combat_encounters, 1);
        assert_eq!(store.game_state().turn_count, 1);
        assert!(store.codex().enemies.contains_key("wolf"));
        assert!(store.codex().locations.contains_key("pine_trail"));
        assert_eq!(store.current_location(), Some("Pine Trail"));
    }

    #[test]
    fn unknown_quest_progress_is_deferred() {
        let mut store = started_store();
        let report = apply_story(
            &mut store,
            StoryResponse {
                story: "You find a clue.".into(),
                quest_progress: Some(QuestProgressUpdate {
                    quest_id: "missing".into(),
                    progress: 50,
                    completed_objectives: vec![],
                }),
                ..Default::default()
            },
        );
        assert!(!report.is_applied("quest_progress"));
        assert!(!report.is_applied("choices"));
    }

    #[test]
    fn victory_pays_and_leaves_combat() {
        let mut store = started_store();
        store.set_enemy(Some(wolf(4)));
        store.advance_phase(PhaseEvent::EnemyEncountered);
        let coins = store.player().unwrap().coins;

        let report = apply_combat(
            &mut store,
            CombatAction::Attack,
            None,
            CombatResponse {
                damage_dealt: 4,
                enemy_health: Some(0),
                player_health: Some(90),
                combat_log: vec!["You bite back harder.".into()],
                victory: true,
                rewards: Some(CombatRewards { xp: 30, coins: 12, items: vec![] }),
                ..Default::default()
            },
        );

        assert!(report.is_applied("victory"));
        assert!(store.current_enemy().is_none());
        assert_eq!(store.game_state().story_phase, StoryPhase::Exploration);
        assert!(store.game_state().is_after_combat);
        assert_eq!(store.player().unwrap().coins, coins + 12);
        assert_eq!(store.player().unwrap().xp, 30);
        assert_eq!(store.progression().enemies_defeated, 1);
        assert_eq!(store.screen(), Screen::Story);
    }

    #[test]
    fn defeat_routes_to_game_over() {
        let mut store = started_store();
        store.set_enemy(Some(wolf(30)));
        let report = apply_combat(
            &mut store,
            CombatAction::Defend,
            None,
            CombatResponse {
                damage_taken: 500,
                defeat: true,
                ..Default::default()
            },
        );
        assert!(report.is_applied("defeat"));
        assert_eq!(store.player().unwrap().health, 0);
        assert_eq!(store.screen(), Screen::GameOver);
    }

    #[test]
    fn combat_without_enemy_is_rejected() {
        let mut store = started_store();
        let before = store.clone();
        let report = apply_combat(&mut store, CombatAction::Attack, None, CombatResponse::default());
        assert!(!report.is_applied("victory"));
        assert_eq!(store, before);
    }

    #[test]
    fn completion_after_final_puzzle() {
        let mut store = started_store();
        store.add_quest(Quest {
            id: "main".into(),
            title: "Main".into(),
            description: String::new(),
            objectives: vec![],
            progress: 90,
            reward: QuestReward::default(),
        });
        apply_story(
            &mut store,
            StoryResponse {
                story: "The final door stands before you.".into(),
                is_final_phase: true,
                ..Default::default()
            },
        );
        assert_eq!(store.game_state().story_phase, StoryPhase::FinalPuzzle);

        apply_story(
            &mut store,
            StoryResponse {
                story: "The door opens.".into(),
                game_completed: true,
                quest_progress: Some(QuestProgressUpdate {
                    quest_id: "main".into(),
                    progress: 100,
                    completed_objectives: vec![],
                }),
                ..Default::default()
            },
        );
        assert_eq!(store.game_state().story_phase, StoryPhase::Completed);
        assert_eq!(store.completed_quests().len(), 1);
        assert_eq!(store.player_score(), 200);
    }
}
