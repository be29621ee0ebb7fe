use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryPhase {
    #[default]
    Exploration,
    Combat,
    FinalPuzzle,
    Completed,
}

/// Named triggers for moving between [`StoryPhase`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    EnemyEncountered,
    CombatEnded,
    FinalPuzzleReached,
    PuzzleSolved,
}

impl StoryPhase {
    /// The phase reached from `self` on `event`, or `None` if the
    /// transition is not allowed.
    pub fn next(self, event: PhaseEvent) -> Option<StoryPhase> {
        use PhaseEvent::*;
        use StoryPhase::*;

        match (self, event) {
            (Exploration, EnemyEncountered) => Some(Combat),
            (FinalPuzzle, EnemyEncountered) => Some(Combat),
            (Combat, CombatEnded) => Some(Exploration),
            (Exploration, FinalPuzzleReached) => Some(FinalPuzzle),
            (FinalPuzzle, PuzzleSolved) => Some(Completed),
            _ => None,
        }
    }
}

/// Session flags coordinating the UI and pending network work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub turn_count: u32,
    pub story_phase: StoryPhase,
    pub combat_encounters: u32,
    pub combat_escapes: u32,
    pub is_after_combat: bool,
    pub is_final_phase: bool,
    pub is_initialized: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStatePatch {
    pub turn_count: Option<u32>,
    pub story_phase: Option<StoryPhase>,
    pub combat_encounters: Option<u32>,
    pub combat_escapes: Option<u32>,
    pub is_after_combat: Option<bool>,
    pub is_final_phase: Option<bool>,
    pub is_initialized: Option<bool>,
}

impl GameState {
    pub fn merge(&mut self, patch: GameStatePatch) {
        if let Some(v) = patch.turn_count {
            self.turn_count = v;
        }
        if let Some(v) = patch.story_phase {
            self.story_phase = v;
        }
        if let Some(v) = patch.combat_encounters {
            self.combat_encounters = v;
        }
        if let Some(v) = patch.combat_escapes {
            self.combat_escapes = v;
        }
        if let Some(v) = patch.is_after_combat {
            self.is_after_combat = v;
        }
        if let Some(v) = patch.is_final_phase {
            self.is_final_phase = v;
        }
        if let Some(v) = patch.is_initialized {
            self.is_initialized = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    MainMenu,
    CharacterCreation,
    Story,
    Combat,
    Shop,
    Crafting,
    Codex,
    Leaderboard,
    Arcade,
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_round_trips_back_to_exploration() {
        let phase = StoryPhase::Exploration;
        let phase = phase.next(PhaseEvent::EnemyEncountered).unwrap();
        assert_eq!(phase, StoryPhase::Combat);
        assert_eq!(phase.next(PhaseEvent::CombatEnded), Some(StoryPhase::Exploration));
    }

    #[test]
    fn completed_is_terminal() {
        for event in [
            PhaseEvent::EnemyEncountered,
            PhaseEvent::CombatEnded,
            PhaseEvent::FinalPuzzleReached,
            PhaseEvent::PuzzleSolved,
        ] {
            assert_eq!(StoryPhase::Completed.next(event), None);
        }
    }

    #[test]
    fn puzzle_cannot_be_solved_during_exploration() {
        assert_eq!(StoryPhase::Exploration.next(PhaseEvent::PuzzleSolved), None);
    }
}
