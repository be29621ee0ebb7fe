//! The session store: one owned value holding everything the client knows
//! about the running game, changed only through the named mutators below.
//!
//! Mutators never fail. When a precondition does not hold (no player, an
//! unknown item, not enough coins) the call is skipped and a `debug` trace
//! is emitted; callers get no signal.

use chrono::Utc;
use tracing::{debug, warn};

use crate::model::catalog;
use crate::model::codex::{Codex, CodexEntry, Discovery};
use crate::model::crafting::Recipe;
use crate::model::engagement::{
    Badge, Cameo, Challenge, CollectionSet, Milestone, ProgressionEvent, ProgressionStats,
};
use crate::model::enemy::Enemy;
use crate::model::game_state::{GameState, GameStatePatch, PhaseEvent, Screen, StoryPhase};
use crate::model::item::{Item, ItemType};
use crate::model::player::{
    Ability, EquipSlot, EquippedItems, NewCharacter, Player, PlayerPatch, Position,
};
use crate::model::quest::Quest;
use crate::model::story::{StoryEvent, StoryEventType};

/// `max_xp` grows by 3/2 per level.
pub const XP_GROWTH_NUM: u32 = 3;
pub const XP_GROWTH_DEN: u32 = 2;
/// `max_health` grows by a tenth per level.
pub const HEALTH_GROWTH_DIVISOR: u32 = 10;
pub const STAT_GAIN_PER_LEVEL: i32 = 2;
pub const POTION_HEAL: u32 = 30;
pub const STARTING_XP_CAP: u32 = 100;
pub const STARTING_COINS: u32 = 50;
pub const STARTING_SCORE: u32 = 100;
pub const ABANDON_SCORE_PENALTY: u32 = 10;

pub const DEFAULT_GENRE: &str = "fantasy";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStore {
    pub(crate) screen: Screen,
    pub(crate) is_processing: bool,
    pub(crate) loading_story: bool,

    pub(crate) player: Option<Player>,
    pub(crate) current_enemy: Option<Enemy>,
    pub(crate) story_events: Vec<StoryEvent>,
    pub(crate) current_choices: Vec<String>,
    pub(crate) current_location: Option<String>,
    pub(crate) game_state: GameState,

    pub(crate) quests: Vec<Quest>,
    pub(crate) completed_quests: Vec<Quest>,
    pub(crate) abandoned_quests: u32,
    pub(crate) player_score: u32,

    pub(crate) badges: Vec<Badge>,
    pub(crate) codex: Codex,
    pub(crate) learned_recipes: Vec<String>,
    pub(crate) milestones: Vec<Milestone>,
    pub(crate) collections: Vec<CollectionSet>,
    pub(crate) challenges: Vec<Challenge>,
    pub(crate) progression: ProgressionStats,
    pub(crate) cameos: Vec<Cameo>,

    pub(crate) genre: String,
    pub(crate) language: String,
}

impl Default for GameStore {
    fn default() -> Self {
        Self {
            screen: Screen::MainMenu,
            is_processing: false,
            loading_story: false,

            player: None,
            current_enemy: None,
            story_events: Vec::new(),
            current_choices: Vec::new(),
            current_location: None,
            game_state: GameState::default(),

            quests: Vec::new(),
            completed_quests: Vec::new(),
            abandoned_quests: 0,
            player_score: STARTING_SCORE,

            badges: Vec::new(),
            codex: Codex::default(),
            learned_recipes: Vec::new(),
            milestones: catalog::starting_milestones(),
            collections: catalog::starting_collections(),
            challenges: catalog::starting_challenges(),
            progression: ProgressionStats::default(),
            cameos: Vec::new(),

            genre: DEFAULT_GENRE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// A partial store built from untrusted input. `None` leaves the current
/// value in place; for `player` and `current_enemy` the inner `None` means
/// the field was present and null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorePatch {
    pub player: Option<Option<Player>>,
    pub current_enemy: Option<Option<Enemy>>,
    pub story_events: Option<Vec<StoryEvent>>,
    pub current_choices: Option<Vec<String>>,
    pub current_location: Option<Option<String>>,
    pub game_state: Option<GameState>,
    pub quests: Option<Vec<Quest>>,
    pub completed_quests: Option<Vec<Quest>>,
    pub abandoned_quests: Option<u32>,
    pub player_score: Option<u32>,
    pub badges: Option<Vec<Badge>>,
    pub codex: Option<Codex>,
    pub learned_recipes: Option<Vec<String>>,
    pub milestones: Option<Vec<Milestone>>,
    pub collections: Option<Vec<CollectionSet>>,
    pub challenges: Option<Vec<Challenge>>,
    pub progression: Option<ProgressionStats>,
    pub cameos: Option<Vec<Cameo>>,
    pub genre: Option<String>,
    pub language: Option<String>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /* =========================
       Reads
       ========================= */

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn loading_story(&self) -> bool {
        self.loading_story
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn current_enemy(&self) -> Option<&Enemy> {
        self.current_enemy.as_ref()
    }

    pub fn story_events(&self) -> &[StoryEvent] {
        &self.story_events
    }

    pub fn current_choices(&self) -> &[String] {
        &self.current_choices
    }

    pub fn current_location(&self) -> Option<&str> {
        self.current_location.as_deref()
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    /// The quest the UI treats as primary.
    pub fn active_quest(&self) -> Option<&Quest> {
        self.quests.first()
    }

    pub fn completed_quests(&self) -> &[Quest] {
        &self.completed_quests
    }

    pub fn abandoned_quests(&self) -> u32 {
        self.abandoned_quests
    }

    pub fn player_score(&self) -> u32 {
        self.player_score
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn codex(&self) -> &Codex {
        &self.codex
    }

    pub fn learned_recipes(&self) -> &[String] {
        &self.learned_recipes
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn collections(&self) -> &[CollectionSet] {
        &self.collections
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn progression(&self) -> &ProgressionStats {
        &self.progression
    }

    pub fn cameos(&self) -> &[Cameo] {
        &self.cameos
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// The last `count` story events, oldest first.
    pub fn recent_events(&self, count: usize) -> &[StoryEvent] {
        let start = self.story_events.len().saturating_sub(count);
        &self.story_events[start..]
    }

    /* =========================
       Guards
       ========================= */

    /// Every player mutator goes through here; a missing player turns the
    /// mutation into a no-op.
    fn player_mut(&mut self, op: &'static str) -> Option<&mut Player> {
        if self.player.is_none() {
            debug!(op, "no active player, mutation skipped");
        }
        self.player.as_mut()
    }

    fn push_event(&mut self, text: impl Into<String>, event_type: StoryEventType) {
        self.story_events.push(StoryEvent::new(text, event_type));
    }

    /* =========================
       Session
       ========================= */

    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn set_processing(&mut self, processing: bool) {
        self.is_processing = processing;
    }

    pub fn set_loading_story(&mut self, loading: bool) {
        self.loading_story = loading;
    }

    pub fn set_adventure(&mut self, genre: &str, language: &str) {
        if !genre.trim().is_empty() {
            self.genre = genre.trim().to_string();
        }
        if !language.trim().is_empty() {
            self.language = language.trim().to_string();
        }
    }

    pub fn set_choices(&mut self, choices: Vec<String>) {
        self.current_choices = choices;
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.current_location = location;
    }

    pub fn update_game_state(&mut self, patch: GameStatePatch) {
        self.game_state.merge(patch);
    }

    /// Moves `story_phase` along a legal transition. Illegal transitions
    /// leave the phase untouched.
    pub fn advance_phase(&mut self, event: PhaseEvent) {
        let current = self.game_state.story_phase;
        match current.next(event) {
            Some(next) => {
                self.game_state.story_phase = next;
                self.game_state.is_final_phase =
                    matches!(next, StoryPhase::FinalPuzzle | StoryPhase::Completed);
            }
            None => warn!(?current, ?event, "phase transition rejected"),
        }
    }

    pub fn reset_game(&mut self) {
        *self = GameStore::new();
    }

    /// Merges a normalized partial over the current state.
    pub fn apply_patch(&mut self, patch: StorePatch) {
        if let Some(v) = patch.player {
            self.player = v;
        }
        if let Some(v) = patch.current_enemy {
            self.current_enemy = v;
        }
        if let Some(v) = patch.story_events {
            self.story_events = v;
        }
        if let Some(v) = patch.current_choices {
            self.current_choices = v;
        }
        if let Some(v) = patch.current_location {
            self.current_location = v;
        }
        if let Some(v) = patch.game_state {
            self.game_state = v;
        }
        if let Some(v) = patch.quests {
            self.quests = v;
        }
        if let Some(v) = patch.completed_quests {
            self.completed_quests = v;
        }
        if let Some(v) = patch.abandoned_quests {
            self.abandoned_quests = v;
        }
        if let Some(v) = patch.player_score {
            self.player_score = v;
        }
        if let Some(v) = patch.badges {
            self.badges = v;
        }
        if let Some(v) = patch.codex {
            self.codex = v;
        }
        if let Some(v) = patch.learned_recipes {
            self.learned_recipes = v;
        }
        if let Some(v) = patch.milestones {
            self.milestones = v;
        }
        if let Some(v) = patch.collections {
            self.collections = v;
        }
        if let Some(v) = patch.challenges {
            self.challenges = v;
        }
        if let Some(v) = patch.progression {
            self.progression = v;
        }
        if let Some(v) = patch.cameos {
            self.cameos = v;
        }
        if let Some(v) = patch.genre {
            self.genre = v;
        }
        if let Some(v) = patch.language {
            self.language = v;
        }
    }

    /* =========================
       Player
       ========================= */

    pub fn create_character(&mut self, base: NewCharacter) {
        let name = base.name.trim();
        if name.is_empty() {
            debug!("character name is blank, creation skipped");
            return;
        }

        let profile = base.class.starting_profile();
        self.player = Some(Player {
            name: name.to_string(),
            class: base.class,
            gender: base.gender,
            level: 1,
            health: profile.max_health,
            max_health: profile.max_health,
            xp: 0,
            max_xp: STARTING_XP_CAP,
            mana: profile.max_mana,
            max_mana: profile.max_mana,
            coins: STARTING_COINS,
            dungeon_level: 1,
            position: Position::default(),
            inventory: Vec::new(),
            equipped_items: EquippedItems::default(),
            stats: profile.stats,
            abilities: Default::default(),
        });
    }

    /// Shallow merge. Writing `xp` runs the level-up cascade.
    pub fn update_player(&mut self, patch: PlayerPatch) {
        let xp_written = patch.xp.is_some();
        let Some(player) = self.player_mut("update_player") else {
            return;
        };

        merge_player(player, patch);

        let gained = if xp_written { level_up_cascade(player) } else { 0 };
        let level = player.level;

        if gained > 0 {
            let noun = if gained == 1 { "level" } else { "levels" };
            self.push_event(
                format!("Level up! +{gained} {noun}. You are now level {level}."),
                StoryEventType::LevelUp,
            );
        }
    }

    pub fn gain_xp(&mut self, amount: u32) {
        let Some(xp) = self.player.as_ref().map(|p| p.xp) else {
            debug!(op = "gain_xp", "no active player, mutation skipped");
            return;
        };
        self.update_player(PlayerPatch {
            xp: Some(xp.saturating_add(amount)),
            ..Default::default()
        });
    }

    pub fn damage_player(&mut self, amount: u32) {
        if let Some(player) = self.player_mut("damage_player") {
            player.health = player.health.saturating_sub(amount).min(player.max_health);
        }
    }

    pub fn heal_player(&mut self, amount: u32) {
        if let Some(player) = self.player_mut("heal_player") {
            player.health = player.health.saturating_add(amount).min(player.max_health);
        }
    }

    /// Sets health directly, clamped to `[0, max_health]`.
    pub fn set_player_health(&mut self, health: u32) {
        if let Some(player) = self.player_mut("set_player_health") {
            player.health = health.min(player.max_health);
        }
    }

    pub fn learn_ability(&mut self, ability: Ability) {
        if let Some(player) = self.player_mut("learn_ability") {
            player.abilities.insert(ability.id.clone(), ability);
        }
    }

    /// Spends the ability's mana. Skipped when the ability is unknown or
    /// mana is short.
    pub fn use_ability(&mut self, ability_id: &str) {
        let Some(player) = self.player_mut("use_ability") else {
            return;
        };
        let Some(cost) = player.abilities.get(ability_id).map(|a| a.mana_cost) else {
            debug!(ability_id, "unknown ability");
            return;
        };
        if player.mana < cost {
            debug!(ability_id, mana = player.mana, cost, "not enough mana");
            return;
        }
        player.mana -= cost;
    }

    /* =========================
       Enemy
       ========================= */

    pub fn set_enemy(&mut self, enemy: Option<Enemy>) {
        self.current_enemy = enemy;
    }

    pub fn damage_enemy(&mut self, amount: u32) {
        match self.current_enemy.as_mut() {
            Some(enemy) => {
                enemy.health = enemy.health.saturating_sub(amount).min(enemy.max_health);
            }
            None => debug!(op = "damage_enemy", "no current enemy, mutation skipped"),
        }
    }

    pub fn set_enemy_health(&mut self, health: u32) {
        if let Some(enemy) = self.current_enemy.as_mut() {
            enemy.health = health.min(enemy.max_health);
        }
    }

    /* =========================
       Inventory
       ========================= */

    /// Adds `item`, merging into an existing entry with the same id.
    pub fn add_item(&mut self, item: Item) {
        if item.quantity == 0 {
            debug!(item_id = %item.id, "zero-quantity item ignored");
            return;
        }
        let Some(player) = self.player_mut("add_item") else {
            return;
        };

        let item_id = item.id.clone();
        let discovery = Discovery {
            category: crate::model::codex::CodexCategory::Items,
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            stats: Default::default(),
        };

        match player.inventory.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => player.inventory.push(item),
        }

        self.discover(discovery);
        self.register_collected(&item_id);
    }

    /// Removes up to `quantity` units; the entry disappears at zero.
    pub fn remove_item(&mut self, item_id: &str, quantity: u32) {
        if let Some(player) = self.player_mut("remove_item") {
            take_units(player, item_id, quantity);
        }
    }

    /// Consumes one unit. Potions heal [`POTION_HEAL`], capped at max health.
    pub fn use_item(&mut self, item_id: &str) {
        let Some(player) = self.player_mut("use_item") else {
            return;
        };
        let Some(item) = player.find_item(item_id) else {
            debug!(item_id, "item not in inventory");
            return;
        };

        let name = item.name.clone();
        let is_potion = item.item_type == ItemType::Potion;
        if is_potion {
            self.heal_player(POTION_HEAL);
        }
        self.remove_item(item_id, 1);

        self.push_event(format!("You used {name}."), StoryEventType::Item);
    }

    pub fn equip_item(&mut self, item_id: &str) {
        let Some(player) = self.player_mut("equip_item") else {
            return;
        };
        let Some(slot) = player.find_item(item_id).and_then(|i| i.slot) else {
            debug!(item_id, "item missing or not equippable");
            return;
        };
        *player.equipped_items.slot_mut(slot) = Some(item_id.to_string());
    }

    pub fn unequip(&mut self, slot: EquipSlot) {
        if let Some(player) = self.player_mut("unequip") {
            *player.equipped_items.slot_mut(slot) = None;
        }
    }

    /* =========================
       Economy
       ========================= */

    pub fn add_coins(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        let Some(player) = self.player_mut("add_coins") else {
            return;
        };
        player.coins = player.coins.saturating_add(amount);
        self.progression.record(ProgressionEvent::CoinsEarned(amount));
    }

    /// Buys `item` at `price × quantity`; skipped when coins are short.
    pub fn buy_item(&mut self, item: Item) {
        let cost = item.price.saturating_mul(item.quantity);
        let Some(player) = self.player_mut("buy_item") else {
            return;
        };
        if player.coins < cost {
            debug!(item_id = %item.id, coins = player.coins, cost, "not enough coins");
            return;
        }
        player.coins -= cost;
        self.add_item(item);
    }

    /// Sells one unit for half its price, rounded down.
    pub fn sell_item(&mut self, item_id: &str) {
        let Some(player) = self.player_mut("sell_item") else {
            return;
        };
        let Some(price) = player.find_item(item_id).map(|i| i.price) else {
            debug!(item_id, "item not in inventory");
            return;
        };
        take_units(player, item_id, 1);
        player.coins = player.coins.saturating_add(price / 2);
    }

    /* =========================
       Crafting
       ========================= */

    pub fn learn_recipe(&mut self, recipe_id: &str) {
        if !self.learned_recipes.iter().any(|r| r == recipe_id) {
            self.learned_recipes.push(recipe_id.to_string());
        }
    }

    pub fn craft(&mut self, recipe: &Recipe) {
        if !self.learned_recipes.iter().any(|r| *r == recipe.id) {
            debug!(recipe_id = %recipe.id, "recipe not learned");
            return;
        }
        let Some(player) = self.player_mut("craft") else {
            return;
        };
        let missing = recipe
            .ingredients
            .iter()
            .find(|ing| player.item_quantity(&ing.item_id) < ing.quantity);
        if let Some(ing) = missing {
            debug!(recipe_id = %recipe.id, item_id = %ing.item_id, "missing ingredient");
            return;
        }

        for ing in &recipe.ingredients {
            self.remove_item(&ing.item_id, ing.quantity);
        }

        self.add_item(recipe.output.clone());
        self.record_progress(ProgressionEvent::ItemCrafted);
        self.push_event(format!("You crafted {}.", recipe.output.name), StoryEventType::Item);
    }

    /* =========================
       Quests
       ========================= */

    pub fn add_quest(&mut self, quest: Quest) {
        if self.completed_quests.iter().any(|q| q.id == quest.id) {
            debug!(quest_id = %quest.id, "quest already completed");
            return;
        }
        match self.quests.iter_mut().find(|q| q.id == quest.id) {
            Some(existing) => *existing = quest,
            None => self.quests.push(quest),
        }
    }

    /// Progress is clamped to 100; reaching 100 completes the quest.
    pub fn update_quest_progress(
        &mut self,
        quest_id: &str,
        progress: u32,
        completed_objectives: &[usize],
    ) {
        let Some(quest) = self.quests.iter_mut().find(|q| q.id == quest_id) else {
            debug!(quest_id, "quest not active");
            return;
        };
        quest.progress = progress.min(100);
        for &index in completed_objectives {
            if let Some(objective) = quest.objectives.get_mut(index) {
                objective.completed = true;
            }
        }
        if quest.is_done() {
            self.complete_quest(quest_id);
        }
    }

    /// Moves the quest to the completed list and pays its reward.
    pub fn complete_quest(&mut self, quest_id: &str) {
        let Some(index) = self.quests.iter().position(|q| q.id == quest_id) else {
            debug!(quest_id, "quest not active");
            return;
        };
        let mut quest = self.quests.remove(index);
        quest.progress = 100;
        for objective in &mut quest.objectives {
            objective.completed = true;
        }
        let reward = quest.reward.clone();
        self.push_event(format!("Quest completed: {}", quest.title), StoryEventType::Quest);
        self.completed_quests.push(quest);
        self.record_progress(ProgressionEvent::QuestCompleted);

        self.add_coins(reward.coins);
        for item in reward.items {
            self.add_item(item);
        }
        if reward.xp > 0 {
            self.gain_xp(reward.xp);
        }
    }

    pub fn abandon_quest(&mut self, quest_id: &str) {
        let before = self.quests.len();
        self.quests.retain(|q| q.id != quest_id);
        if self.quests.len() == before {
            debug!(quest_id, "quest not active");
            return;
        }
        self.abandoned_quests += 1;
        self.player_score = self.player_score.saturating_sub(ABANDON_SCORE_PENALTY);
    }

    /* =========================
       Engagement
       ========================= */

    /// Set-like by id: a badge already held is kept as first earned.
    pub fn unlock_badge(&mut self, badge: Badge) {
        if self.badges.iter().any(|b| b.id == badge.id) {
            return;
        }
        self.badges.push(badge);
    }

    /// Records a codex discovery, bumping the encounter count if the entry
    /// already exists.
    pub fn discover(&mut self, discovery: Discovery) {
        let entries = self.codex.category_mut(discovery.category);
        match entries.get_mut(&discovery.id) {
            Some(entry) => entry.times_encountered += 1,
            None => {
                entries.insert(
                    discovery.id,
                    CodexEntry {
                        name: discovery.name,
                        description: discovery.description,
                        stats: discovery.stats,
                        times_encountered: 1,
                        discovered_at: Utc::now(),
                    },
                );
            }
        }
    }

    pub fn add_score(&mut self, delta: i64) {
        let score = i64::from(self.player_score).saturating_add(delta).max(0);
        self.player_score = u32::try_from(score).unwrap_or(u32::MAX);
    }

    pub fn advance_milestone(&mut self, milestone_id: &str, amount: u32) {
        let Some(milestone) = self.milestones.iter_mut().find(|m| m.id == milestone_id) else {
            return;
        };
        if milestone.is_achieved() {
            return;
        }
        milestone.progress = milestone.progress.saturating_add(amount).min(milestone.target);
        if milestone.progress >= milestone.target {
            milestone.achieved_at = Some(Utc::now());
            let title = milestone.title.clone();
            self.push_event(format!("Milestone reached: {title}"), StoryEventType::System);
        }
    }

    /// Completed challenges pay their coin reward once.
    pub fn advance_challenge(&mut self, challenge_id: &str, amount: u32) {
        let Some(challenge) = self.challenges.iter_mut().find(|c| c.id == challenge_id) else {
            return;
        };
        if challenge.completed {
            return;
        }
        challenge.progress = challenge.progress.saturating_add(amount).min(challenge.target);
        if challenge.progress >= challenge.target {
            challenge.completed = true;
            let reward = challenge.reward_coins;
            self.add_coins(reward);
        }
    }

    pub fn record_progress(&mut self, event: ProgressionEvent) {
        self.progression.record(event);
        match event {
            ProgressionEvent::EnemyDefeated => {
                self.advance_milestone("first_blood", 1);
                self.advance_milestone("monster_hunter", 1);
                self.advance_challenge("daily_slayer", 1);
            }
            ProgressionEvent::QuestCompleted => self.advance_milestone("quest_master", 1),
            ProgressionEvent::PuzzleSolved => self.advance_challenge("daily_puzzler", 1),
            _ => {}
        }
    }

    pub fn add_cameo(&mut self, cameo: Cameo) {
        if self.cameos.iter().any(|c| c.id == cameo.id) {
            return;
        }
        self.cameos.push(cameo);
    }

    pub fn add_story_event(&mut self, text: impl Into<String>, event_type: StoryEventType) {
        self.push_event(text, event_type);
    }

    fn register_collected(&mut self, item_id: &str) {
        let mut reward = 0;
        for set in &mut self.collections {
            if set.completed || !set.item_ids.iter().any(|id| id == item_id) {
                continue;
            }
            if !set.collected.iter().any(|id| id == item_id) {
                set.collected.push(item_id.to_string());
            }
            if set.item_ids.iter().all(|id| set.collected.contains(id)) {
                set.completed = true;
                reward += set.reward_coins;
            }
        }
        self.add_coins(reward);
    }
}

fn merge_player(player: &mut Player, patch: PlayerPatch) {
    if let Some(v) = patch.name {
        player.name = v;
    }
    if let Some(v) = patch.gender {
        player.gender = v;
    }
    if let Some(v) = patch.level {
        player.level = v;
    }
    if let Some(v) = patch.max_health {
        player.max_health = v;
    }
    if let Some(v) = patch.health {
        player.health = v;
    }
    if let Some(v) = patch.max_xp {
        player.max_xp = v;
    }
    if let Some(v) = patch.xp {
        player.xp = v;
    }
    if let Some(v) = patch.max_mana {
        player.max_mana = v;
    }
    if let Some(v) = patch.mana {
        player.mana = v;
    }
    if let Some(v) = patch.coins {
        player.coins = v;
    }
    if let Some(v) = patch.dungeon_level {
        player.dungeon_level = v;
    }
    if let Some(v) = patch.position {
        player.position = v;
    }
    if let Some(v) = patch.stats {
        player.stats = v;
    }

    player.health = player.health.min(player.max_health);
    player.mana = player.mana.min(player.max_mana);
}

/// Promotes while `xp >= max_xp`, carrying the remainder. Returns the
/// number of levels gained. All growth saturates, so huge values from a
/// loaded save stop at the numeric ceiling instead of overflowing.
pub(crate) fn level_up_cascade(player: &mut Player) -> u32 {
    let mut gained: u32 = 0;
    while player.max_xp > 0 && player.xp >= player.max_xp {
        player.xp -= player.max_xp;
        player.level = player.level.saturating_add(1);
        let grown =
            u64::from(player.max_xp) * u64::from(XP_GROWTH_NUM) / u64::from(XP_GROWTH_DEN);
        player.max_xp = u32::try_from(grown)
            .unwrap_or(u32::MAX)
            .max(player.max_xp.saturating_add(1));
        player.max_health = player
            .max_health
            .saturating_add((player.max_health / HEALTH_GROWTH_DIVISOR).max(1));
        let stats = &mut player.stats;
        stats.strength = stats.strength.saturating_add(STAT_GAIN_PER_LEVEL);
        stats.intelligence = stats.intelligence.saturating_add(STAT_GAIN_PER_LEVEL);
        stats.agility = stats.agility.saturating_add(STAT_GAIN_PER_LEVEL);
        gained = gained.saturating_add(1);
    }
    if gained > 0 {
        player.health = player.max_health;
    }
    gained
}

/// Removes units from an inventory entry, dropping it (and any slot that
/// held it) at zero.
fn take_units(player: &mut Player, item_id: &str, quantity: u32) {
    let Some(index) = player.inventory.iter().position(|i| i.id == item_id) else {
        return;
    };
    let entry = &mut player.inventory[index];
    entry.quantity = entry.quantity.saturating_sub(quantity);
    if entry.quantity == 0 {
        player.inventory.remove(index);
        player.equipped_items.clear_item(item_id);
    }
}
