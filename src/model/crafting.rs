use serde::{Deserialize, Serialize};

use crate::model::item::{Item, ItemType, Rarity, StatBonuses};
use crate::model::player::EquipSlot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub output: Item,
}

fn ingredient(item_id: &str, quantity: u32) -> Ingredient {
    Ingredient { item_id: item_id.into(), quantity }
}

/// Recipes the crafting screen can offer.
pub fn recipe_catalog() -> Vec<Recipe> {
    vec![
        Recipe {
            id: "recipe_health_potion".into(),
            name: "Health Potion".into(),
            ingredients: vec![ingredient("herb", 2), ingredient("empty_vial", 1)],
            output: Item::new("health_potion", "Health Potion", ItemType::Potion).with_price(20),
        },
        Recipe {
            id: "recipe_iron_sword".into(),
            name: "Iron Sword".into(),
            ingredients: vec![ingredient("iron_ore", 3), ingredient("leather_strip", 1)],
            output: Item {
                stat_bonuses: Some(StatBonuses { strength: 3, ..Default::default() }),
                rarity: Rarity::Uncommon,
                ..Item::new("iron_sword", "Iron Sword", ItemType::Weapon)
                    .with_slot(EquipSlot::Weapon)
                    .with_price(60)
            },
        },
        Recipe {
            id: "recipe_leather_boots".into(),
            name: "Leather Boots".into(),
            ingredients: vec![ingredient("leather_strip", 3)],
            output: Item {
                stat_bonuses: Some(StatBonuses { agility: 2, ..Default::default() }),
                ..Item::new("leather_boots", "Leather Boots", ItemType::Armor)
                    .with_slot(EquipSlot::Boots)
                    .with_price(35)
            },
        },
    ]
}

pub fn find_recipe(recipe_id: &str) -> Option<Recipe> {
    recipe_catalog().into_iter().find(|r| r.id == recipe_id)
}
