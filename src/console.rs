use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::store::GameStore;
use crate::model::api::CombatAction;
use crate::model::game_state::Screen;
use crate::model::player::{CharacterClass, NewCharacter};

pub const HELP: &str = "\
commands:
  new <name> <warrior|mage|rogue> [gender]   create a character
  start [genre] [language]                   begin the adventure
  <n> | say <text>                           pick choice n or say anything
  attack | defend | run | use <item>         combat (use also works outside combat)
  equip <item> | sell <item>
  learn <recipe> | craft <recipe> | abandon <quest>
  save <name> | saves | load <id> | loadname <name>
  rename <id> <name> | delete <id>
  puzzle [difficulty] | answer <session> <text> | puzzles
  invite [message] | join <code>
  menu | reset | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(EngineCommand),
    Help,
    Quit,
}

/// Terminal front end state: the last snapshot plus how much of the story
/// log has already been printed.
#[derive(Debug, Default)]
pub struct Console {
    last: Option<GameStore>,
    shown_events: usize,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&self, line: &str) -> Result<Input, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let cmd = match word.to_ascii_lowercase().as_str() {
            "" => return Err("type 'help' for commands".into()),
            "help" | "?" => return Ok(Input::Help),
            "quit" | "exit" => return Ok(Input::Quit),

            "new" => {
                let mut parts = rest.split_whitespace();
                let name = parts.next().ok_or("usage: new <name> <class> [gender]")?;
                let class = parts
                    .next()
                    .and_then(CharacterClass::parse)
                    .ok_or("class must be warrior, mage or rogue")?;
                let gender = parts.next().unwrap_or("unspecified");
                EngineCommand::CreateCharacter(NewCharacter {
                    name: name.to_string(),
                    class,
                    gender: gender.to_string(),
                })
            }
            "start" => {
                let mut parts = rest.split_whitespace();
                EngineCommand::StartAdventure {
                    genre: parts.next().map(str::to_string),
                    language: parts.next().map(str::to_string),
                }
            }
            "say" => EngineCommand::Choose(arg.ok_or("usage: say <text>")?),
            n if n.parse::<usize>().is_ok() => {
                let index: usize = n.parse().map_err(|_| "bad number")?;
                let choice = self
                    .last
                    .as_ref()
                    .and_then(|s| s.current_choices().get(index.wrapping_sub(1)))
                    .ok_or_else(|| format!("no choice {index}"))?;
                EngineCommand::Choose(choice.clone())
            }

            "attack" => combat(CombatAction::Attack, None),
            "defend" => combat(CombatAction::Defend, None),
            "run" | "flee" => combat(CombatAction::Run, None),
            "use" => {
                let item = arg.ok_or("usage: use <item>")?;
                if self.in_combat() {
                    combat(CombatAction::UseItem, Some(item))
                } else {
                    EngineCommand::UseItem(item)
                }
            }
            "equip" => EngineCommand::Equip(arg.ok_or("usage: equip <item>")?),
            "sell" => EngineCommand::Sell(arg.ok_or("usage: sell <item>")?),
            "learn" => EngineCommand::LearnRecipe(arg.ok_or("usage: learn <recipe>")?),
            "craft" => EngineCommand::Craft(arg.ok_or("usage: craft <recipe>")?),
            "abandon" => EngineCommand::AbandonQuest(arg.ok_or("usage: abandon <quest>")?),

            "save" => EngineCommand::Save {
                name: arg.unwrap_or_else(|| "quicksave".into()),
            },
            "saves" => EngineCommand::ListSaves,
            "load" => EngineCommand::Load(arg.ok_or("usage: load <id>")?),
            "loadname" => EngineCommand::LoadByName(arg.ok_or("usage: loadname <name>")?),
            "rename" => {
                let (id, name) = rest
                    .split_once(char::is_whitespace)
                    .ok_or("usage: rename <id> <name>")?;
                EngineCommand::RenameSave {
                    save_id: id.to_string(),
                    name: name.trim().to_string(),
                }
            }
            "delete" => EngineCommand::DeleteSave(arg.ok_or("usage: delete <id>")?),

            "puzzle" => EngineCommand::StartPuzzle { difficulty: arg },
            "answer" => {
                let (session, answer) = rest
                    .split_once(char::is_whitespace)
                    .ok_or("usage: answer <session> <text>")?;
                EngineCommand::SubmitPuzzle {
                    session_id: session.to_string(),
                    answer: answer.trim().to_string(),
                }
            }
            "puzzles" => EngineCommand::PuzzleHistory,

            "invite" => EngineCommand::InviteCameo { message: arg },
            "join" => EngineCommand::AcceptCameo {
                invite_code: arg.ok_or("usage: join <code>")?,
            },

            "menu" => EngineCommand::SetScreen(Screen::MainMenu),
            "reset" => EngineCommand::Reset,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(Input::Command(cmd))
    }

    fn in_combat(&self) -> bool {
        self.last
            .as_ref()
            .is_some_and(|s| s.current_enemy().is_some())
    }

    /// Text to print for a response, if any.
    pub fn render(&mut self, resp: EngineResponse) -> Option<String> {
        match resp {
            EngineResponse::Snapshot(store) => {
                let text = self.render_snapshot(&store);
                self.last = Some(*store);
                text
            }
            EngineResponse::Notice(msg) => Some(format!("* {msg}")),
            EngineResponse::Applied(_) => None,
            EngineResponse::Saves(saves) if saves.is_empty() => Some("no saves".into()),
            EngineResponse::Saves(saves) => Some(
                saves
                    .iter()
                    .map(|s| format!("  {}  {}  ({}, level {})", s.id, s.name, s.player_name, s.level))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            EngineResponse::Saved(ack) => Some(format!("* saved as {}", ack.save_id)),
            EngineResponse::PuzzleStarted(session) => Some(format!(
                "[puzzle {}] {}\n  ({} attempts)",
                session.session_id, session.prompt, session.max_attempts
            )),
            EngineResponse::PuzzleResult(result) => {
                let verdict = if result.correct { "correct" } else { "wrong" };
                let mut line = format!(
                    "* {verdict}: +{} coins, {} attempts left",
                    result.reward_coins, result.attempts_remaining
                );
                if let Some(explanation) = result.explanation {
                    line.push_str(&format!("\n  {explanation}"));
                }
                Some(line)
            }
            EngineResponse::PuzzleHistory(records) => Some(format!(
                "{} puzzles played, {} solved",
                records.len(),
                records.iter().filter(|r| r.solved).count()
            )),
            EngineResponse::CameoInvite(invite) => {
                Some(format!("* share this code: {}", invite.invite_code))
            }
        }
    }

    fn render_snapshot(&mut self, store: &GameStore) -> Option<String> {
        // A reset or a load can shrink the log.
        if store.story_events().len() < self.shown_events {
            self.shown_events = 0;
        }
        if store.is_processing() || store.loading_story() {
            return Some("...".into());
        }

        let mut out = Vec::new();
        for event in &store.story_events()[self.shown_events..] {
            out.push(event.text.clone());
        }
        self.shown_events = store.story_events().len();
        if out.is_empty() {
            return None;
        }

        if let Some(p) = store.player() {
            out.push(format!(
                "[{} lv{} hp {}/{} mp {}/{} xp {}/{} coins {}]",
                p.name, p.level, p.health, p.max_health, p.mana, p.max_mana, p.xp, p.max_xp, p.coins
            ));
        }
        if let Some(e) = store.current_enemy() {
            out.push(format!("[{} hp {}/{}]", e.name, e.health, e.max_health));
        }
        for (i, choice) in store.current_choices().iter().enumerate() {
            out.push(format!("  {}. {choice}", i + 1));
        }
        Some(out.join("\n"))
    }
}

fn combat(action: CombatAction, item_id: Option<String>) -> EngineCommand {
    EngineCommand::Combat { action, item_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enemy::Enemy;
    use crate::model::story::StoryEventType;

    #[test]
    fn parses_character_creation() {
        let console = Console::new();
        let input = console.parse("new Aria mage female").unwrap();
        assert_eq!(
            input,
            Input::Command(EngineCommand::CreateCharacter(NewCharacter {
                name: "Aria".into(),
                class: CharacterClass::Mage,
                gender: "female".into(),
            }))
        );
        assert!(console.parse("new Aria bard").is_err());
    }

    #[test]
    fn numbered_choice_uses_last_snapshot() {
        let mut console = Console::new();
        assert!(console.parse("1").is_err());

        let mut store = GameStore::new();
        store.set_choices(vec!["Open the door".into(), "Walk away".into()]);
        console.render(EngineResponse::Snapshot(Box::new(store)));

        assert_eq!(
            console.parse("2").unwrap(),
            Input::Command(EngineCommand::Choose("Walk away".into()))
        );
        assert!(console.parse("0").is_err());
        assert!(console.parse("3").is_err());
    }

    #[test]
    fn use_depends_on_combat() {
        let mut console = Console::new();
        assert_eq!(
            console.parse("use health_potion").unwrap(),
            Input::Command(EngineCommand::UseItem("health_potion".into()))
        );

        let mut store = GameStore::new();
        store.set_enemy(Some(Enemy {
            id: "goblin".into(),
            name: "Goblin".into(),
            health: 20,
            max_health: 20,
            level: 1,
            attack: 4,
            defense: 1,
            description: String::new(),
        }));
        console.render(EngineResponse::Snapshot(Box::new(store)));

        assert_eq!(
            console.parse("use health_potion").unwrap(),
            Input::Command(EngineCommand::Combat {
                action: CombatAction::UseItem,
                item_id: Some("health_potion".into()),
            })
        );
    }

    #[test]
    fn snapshot_prints_only_new_events() {
        let mut console = Console::new();
        let mut store = GameStore::new();
        store.create_character(NewCharacter {
            name: "Aria".into(),
            class: CharacterClass::Rogue,
            gender: "f".into(),
        });
        store.add_story_event("The gate creaks.", StoryEventType::Story);

        let first = console
            .render(EngineResponse::Snapshot(Box::new(store.clone())))
            .unwrap();
        assert!(first.contains("The gate creaks."));
        assert!(first.contains("Aria lv1"));

        assert_eq!(console.render(EngineResponse::Snapshot(Box::new(store))), None);
    }
}
