//! Engagement content every new session starts with.

use crate::model::engagement::{Challenge, CollectionSet, Milestone};

pub fn starting_milestones() -> Vec<Milestone> {
    vec![
        Milestone {
            id: "first_blood".into(),
            title: "First Blood".into(),
            target: 1,
            progress: 0,
            achieved_at: None,
        },
        Milestone {
            id: "monster_hunter".into(),
            title: "Monster Hunter".into(),
            target: 25,
            progress: 0,
            achieved_at: None,
        },
        Milestone {
            id: "quest_master".into(),
            title: "Quest Master".into(),
            target: 10,
            progress: 0,
            achieved_at: None,
        },
    ]
}

pub fn starting_collections() -> Vec<CollectionSet> {
    vec![
        CollectionSet {
            id: "alchemist_kit".into(),
            name: "Alchemist's Kit".into(),
            item_ids: vec!["herb".into(), "empty_vial".into(), "health_potion".into()],
            collected: Vec::new(),
            completed: false,
            reward_coins: 50,
        },
        CollectionSet {
            id: "smiths_hoard".into(),
            name: "Smith's Hoard".into(),
            item_ids: vec!["iron_ore".into(), "leather_strip".into(), "iron_sword".into()],
            collected: Vec::new(),
            completed: false,
            reward_coins: 75,
        },
    ]
}

pub fn starting_challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: "daily_slayer".into(),
            title: "Slayer".into(),
            description: "Defeat 3 enemies".into(),
            target: 3,
            progress: 0,
            completed: false,
            reward_coins: 30,
        },
        Challenge {
            id: "daily_puzzler".into(),
            title: "Puzzler".into(),
            description: "Solve 2 arcade puzzles".into(),
            target: 2,
            progress: 0,
            completed: false,
            reward_coins: 25,
        },
    ]
}
