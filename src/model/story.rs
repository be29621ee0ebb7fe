use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryEventType {
    Story,
    Combat,
    Item,
    LevelUp,
    Quest,
    System,
    /// Any type this client does not know, e.g. from an older save.
    #[serde(other)]
    Other,
}

/// One line of the append-only story log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEvent {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: StoryEventType,
}

impl StoryEvent {
    pub fn new(text: impl Into<String>, event_type: StoryEventType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            timestamp: Utc::now(),
            event_type,
        }
    }
}
