use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub description: String,
}

impl Enemy {
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}
