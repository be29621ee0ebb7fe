use crate::engine::store::GameStore;
use crate::model::api::{
    CameoInvite, CombatAction, PuzzleRecord, PuzzleResult, PuzzleSession,
};
use crate::model::event_result::ApplyReport;
use crate::model::game_save::{SaveAck, SaveSummary};
use crate::model::game_state::Screen;
use crate::model::item::Item;
use crate::model::player::NewCharacter;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    CreateCharacter(NewCharacter),
    StartAdventure {
        genre: Option<String>,
        language: Option<String>,
    },
    Choose(String),
    Combat {
        action: CombatAction,
        item_id: Option<String>,
    },
    UseItem(String),
    Equip(String),
    Buy(Item),
    Sell(String),
    LearnRecipe(String),
    Craft(String),
    AbandonQuest(String),

    Save {
        name: String,
    },
    ListSaves,
    Load(String),
    LoadByName(String),
    RenameSave {
        save_id: String,
        name: String,
    },
    DeleteSave(String),

    StartPuzzle {
        difficulty: Option<String>,
    },
    SubmitPuzzle {
        session_id: String,
        answer: String,
    },
    PuzzleHistory,

    InviteCameo {
        message: Option<String>,
    },
    AcceptCameo {
        invite_code: String,
    },

    SetScreen(Screen),
    Reset,
}

#[derive(Debug, Clone)]
pub enum EngineResponse {
    /// The whole store after a mutation. Readers never see a partial update.
    Snapshot(Box<GameStore>),

    Applied(ApplyReport),

    /// Short user-facing message, e.g. a failed save.
    Notice(String),

    Saves(Vec<SaveSummary>),
    Saved(SaveAck),
    PuzzleStarted(PuzzleSession),
    PuzzleResult(PuzzleResult),
    PuzzleHistory(Vec<PuzzleRecord>),
    CameoInvite(CameoInvite),
}
