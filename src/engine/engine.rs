use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::config::settings::ClientSettings;
use crate::engine::api_client::ApiClient;
use crate::engine::apply_response::{
    apply_cameo, apply_combat, apply_initialize, apply_puzzle_result, apply_story,
};
use crate::engine::normalizer;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::store::GameStore;
use crate::model::api::{
    CameoAcceptRequest, CameoInviteRequest, CombatAction, CombatRequest, InitializeRequest,
    PuzzleStartRequest, PuzzleSubmitRequest, StoryRequest,
};
use crate::model::crafting::find_recipe;
use crate::model::game_save::{LoadedSave, SaveRequest, SAVE_VERSION};
use crate::model::game_state::Screen;
use crate::model::player::NewCharacter;

/// How many past story events are sent with a story request.
pub const HISTORY_WINDOW: usize = 10;

/// Owns the store and the API client. Commands are handled one at a time,
/// so a response is always applied to the store in full before the next
/// command is looked at.
pub struct Engine {
    store: GameStore,
    api: ApiClient,
    settings: ClientSettings,
}

impl Engine {
    pub fn new(api: ApiClient, settings: ClientSettings) -> Self {
        let mut store = GameStore::new();
        store.set_adventure(&settings.genre, &settings.language);
        Self { store, api, settings }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Runs the engine on its own thread.
    pub fn spawn(self) -> (Sender<EngineCommand>, Receiver<EngineResponse>, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = thread::spawn(move || self.run(cmd_rx, resp_tx));
        (cmd_tx, resp_rx, handle)
    }

    pub fn run(mut self, rx: Receiver<EngineCommand>, tx: Sender<EngineResponse>) {
        while let Ok(cmd) = rx.recv() {
            self.handle(cmd, &mut |resp| {
                let _ = tx.send(resp);
            });
        }
        debug!("command channel closed, engine stopping");
    }

    pub fn handle(&mut self, cmd: EngineCommand, out: &mut dyn FnMut(EngineResponse)) {
        match cmd {
            EngineCommand::CreateCharacter(base) => self.create_character(base, out),
            EngineCommand::StartAdventure { genre, language } => {
                self.start_adventure(genre, language, out)
            }
            EngineCommand::Choose(choice) => self.choose(choice, out),
            EngineCommand::Combat { action, item_id } => self.combat(action, item_id, out),

            EngineCommand::UseItem(item_id) => self.store.use_item(&item_id),
            EngineCommand::Equip(item_id) => self.store.equip_item(&item_id),
            EngineCommand::Buy(item) => self.store.buy_item(item),
            EngineCommand::Sell(item_id) => self.store.sell_item(&item_id),
            EngineCommand::LearnRecipe(recipe_id) => self.store.learn_recipe(&recipe_id),
            EngineCommand::Craft(recipe_id) => match find_recipe(&recipe_id) {
                Some(recipe) => self.store.craft(&recipe),
                None => out(EngineResponse::Notice(format!("Unknown recipe '{recipe_id}'"))),
            },
            EngineCommand::AbandonQuest(quest_id) => self.store.abandon_quest(&quest_id),

            EngineCommand::Save { name } => self.save(name, out),
            EngineCommand::ListSaves => match self.api.list_saves(&self.settings.player_id) {
                Ok(saves) => out(EngineResponse::Saves(saves)),
                Err(e) => out(EngineResponse::Notice(format!("Could not list saves: {e}"))),
            },
            EngineCommand::Load(save_id) => {
                let loaded = self.api.load_save(&save_id);
                self.finish_load(loaded, out)
            }
            EngineCommand::LoadByName(name) => {
                let loaded = self.api.load_save_by_name(&name);
                self.finish_load(loaded, out)
            }
            EngineCommand::RenameSave { save_id, name } => {
                match self.api.rename_save(&save_id, &name) {
                    Ok(()) => out(EngineResponse::Notice(format!("Save renamed to '{name}'"))),
                    Err(e) => out(EngineResponse::Notice(format!("Rename failed: {e}"))),
                }
            }
            EngineCommand::DeleteSave(save_id) => match self.api.delete_save(&save_id) {
                Ok(()) => out(EngineResponse::Notice("Save deleted".into())),
                Err(e) => out(EngineResponse::Notice(format!("Delete failed: {e}"))),
            },

            EngineCommand::StartPuzzle { difficulty } => {
                let request = PuzzleStartRequest {
                    player_id: self.settings.player_id.clone(),
                    difficulty,
                };
                match self.api.start_puzzle(&request) {
                    Ok(session) => {
                        self.store.set_screen(Screen::Arcade);
                        out(EngineResponse::PuzzleStarted(session));
                    }
                    Err(e) => out(EngineResponse::Notice(format!("Could not start puzzle: {e}"))),
                }
            }
            EngineCommand::SubmitPuzzle { session_id, answer } => {
                let request = PuzzleSubmitRequest {
                    player_id: self.settings.player_id.clone(),
                    session_id,
                    answer,
                };
                match self.api.submit_puzzle(&request) {
                    Ok(result) => {
                        out(EngineResponse::Applied(apply_puzzle_result(&mut self.store, &result)));
                        out(EngineResponse::PuzzleResult(result));
                    }
                    Err(e) => out(EngineResponse::Notice(format!("Submission failed: {e}"))),
                }
            }
            EngineCommand::PuzzleHistory => match self.api.puzzle_history(&self.settings.player_id) {
                Ok(history) => out(EngineResponse::PuzzleHistory(history)),
                Err(e) => out(EngineResponse::Notice(format!("Could not load puzzles: {e}"))),
            },

            EngineCommand::InviteCameo { message } => self.invite_cameo(message, out),
            EngineCommand::AcceptCameo { invite_code } => self.accept_cameo(invite_code, out),

            EngineCommand::SetScreen(screen) => self.store.set_screen(screen),
            EngineCommand::Reset => self.store.reset_game(),
        }

        self.publish(out);
    }

    fn publish(&self, out: &mut dyn FnMut(EngineResponse)) {
        out(EngineResponse::Snapshot(Box::new(self.store.clone())));
    }

    /// Marks a request as in flight and lets readers see that before the
    /// network call blocks.
    fn begin_request(&mut self, story: bool, out: &mut dyn FnMut(EngineResponse)) {
        self.store.set_processing(true);
        if story {
            self.store.set_loading_story(true);
        }
        self.publish(out);
    }

    fn end_request(&mut self) {
        self.store.set_processing(false);
        self.store.set_loading_story(false);
    }

    fn create_character(&mut self, base: NewCharacter, out: &mut dyn FnMut(EngineResponse)) {
        self.store.create_character(base);
        match self.store.player() {
            Some(player) => info!(name = %player.name, class = ?player.class, "character created"),
            None => out(EngineResponse::Notice("Your character needs a name.".into())),
        }
    }

    fn start_adventure(
        &mut self,
        genre: Option<String>,
        language: Option<String>,
        out: &mut dyn FnMut(EngineResponse),
    ) {
        let Some(player) = self.store.player().cloned() else {
            out(EngineResponse::Notice("Create a character first.".into()));
            return;
        };
        self.store.set_adventure(
            genre.as_deref().unwrap_or(&self.settings.genre),
            language.as_deref().unwrap_or(&self.settings.language),
        );

        let request = InitializeRequest {
            player,
            genre: self.store.genre().to_string(),
            language: self.store.language().to_string(),
        };

        self.begin_request(true, out);
        let resp = self.api.initialize_game(&request);
        if resp.is_fallback {
            out(EngineResponse::Notice("Playing offline.".into()));
        }
        let report = apply_initialize(&mut self.store, resp);
        self.end_request();
        out(EngineResponse::Applied(report));
    }

    fn choose(&mut self, choice: String, out: &mut dyn FnMut(EngineResponse)) {
        let Some(player) = self.store.player().cloned() else {
            debug!("choice without a player ignored");
            return;
        };
        if !player.is_alive() {
            debug!("choice after death ignored");
            return;
        }

        let request = StoryRequest {
            player,
            genre: self.store.genre().to_string(),
            previous_events: self.store.recent_events(HISTORY_WINDOW).to_vec(),
            choice,
            game_state: self.store.game_state().clone(),
            active_quest: self.store.active_quest().cloned(),
            current_location: self.store.current_location().map(str::to_string),
            language: self.store.language().to_string(),
        };

        self.begin_request(true, out);
        let resp = self.api.generate_story(&request);
        if resp.is_fallback {
            out(EngineResponse::Notice("Playing offline.".into()));
        }
        let report = apply_story(&mut self.store, resp);
        self.end_request();
        out(EngineResponse::Applied(report));
    }

    fn combat(
        &mut self,
        action: CombatAction,
        item_id: Option<String>,
        out: &mut dyn FnMut(EngineResponse),
    ) {
        let (Some(player), Some(enemy)) =
            (self.store.player().cloned(), self.store.current_enemy().cloned())
        else {
            debug!("combat without player or enemy ignored");
            return;
        };

        let request = CombatRequest {
            player,
            enemy,
            action,
            item_id: item_id.clone(),
        };

        self.begin_request(false, out);
        let resp = self.api.resolve_combat(&request);
        let report = apply_combat(&mut self.store, action, item_id.as_deref(), resp);
        self.end_request();
        out(EngineResponse::Applied(report));
    }

    fn save(&mut self, name: String, out: &mut dyn FnMut(EngineResponse)) {
        if self.store.player().is_none() {
            out(EngineResponse::Notice("Nothing to save yet.".into()));
            return;
        }
        let request = SaveRequest {
            player_id: self.settings.player_id.clone(),
            save_name: name,
            version: SAVE_VERSION,
            state: normalizer::serialize(&self.store),
        };

        self.begin_request(false, out);
        let result = self.api.save_game(&request);
        self.end_request();

        match result {
            Ok(ack) => out(EngineResponse::Saved(ack)),
            Err(e) => out(EngineResponse::Notice(format!("Save failed: {e}"))),
        }
    }

    fn finish_load(
        &mut self,
        loaded: Result<LoadedSave, crate::error::ApiError>,
        out: &mut dyn FnMut(EngineResponse),
    ) {
        match loaded {
            Ok(save) => {
                info!(save_id = ?save.id, version = save.version, "save loaded");
                normalizer::restore(&mut self.store, &save.state);
                let screen = if self.store.player().is_some() {
                    Screen::Story
                } else {
                    Screen::CharacterCreation
                };
                self.store.set_screen(screen);
                out(EngineResponse::Notice("Game loaded.".into()));
            }
            Err(e) => out(EngineResponse::Notice(format!("Load failed: {e}"))),
        }
    }

    fn invite_cameo(&mut self, message: Option<String>, out: &mut dyn FnMut(EngineResponse)) {
        let Some(name) = self.store.player().map(|p| p.name.clone()) else {
            out(EngineResponse::Notice("Create a character first.".into()));
            return;
        };
        let request = CameoInviteRequest {
            player_id: self.settings.player_id.clone(),
            player_name: name,
            message,
        };
        match self.api.create_cameo_invite(&request) {
            Ok(invite) => out(EngineResponse::CameoInvite(invite)),
            Err(e) => out(EngineResponse::Notice(format!("Invite failed: {e}"))),
        }
    }

    fn accept_cameo(&mut self, invite_code: String, out: &mut dyn FnMut(EngineResponse)) {
        let Some(name) = self.store.player().map(|p| p.name.clone()) else {
            out(EngineResponse::Notice("Create a character first.".into()));
            return;
        };
        let request = CameoAcceptRequest {
            invite_code,
            player_id: self.settings.player_id.clone(),
            player_name: name,
        };
        match self.api.accept_cameo_invite(&request) {
            Ok(resp) => out(EngineResponse::Applied(apply_cameo(&mut self.store, resp))),
            Err(e) => out(EngineResponse::Notice(format!("Could not join: {e}"))),
        }
    }
}
