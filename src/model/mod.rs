pub mod api;
pub mod catalog;
pub mod codex;
pub mod crafting;
pub mod enemy;
pub mod engagement;
pub mod event_result;
pub mod game_save;
pub mod game_state;
pub mod item;
pub mod player;
pub mod quest;
pub mod story;
