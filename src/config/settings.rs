use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::api_client::RetryPolicy;
use crate::engine::store::{DEFAULT_GENRE, DEFAULT_LANGUAGE};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Overrides `base_url` when set.
pub const BASE_URL_ENV: &str = "NARRATED_QUEST_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub player_id: String,
    pub genre: String,
    pub language: String,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            player_id: String::new(),
            genre: DEFAULT_GENRE.into(),
            language: DEFAULT_LANGUAGE.into(),
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl ClientSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts.max(1),
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Applies the environment override for the backend URL.
    pub fn with_env_override(mut self, env_value: Option<String>) -> Self {
        if let Some(url) = env_value.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    /// Generates a player id if none is stored. Returns whether one was
    /// generated.
    pub fn ensure_player_id(&mut self) -> bool {
        if !self.player_id.trim().is_empty() {
            return false;
        }
        self.player_id = uuid::Uuid::new_v4().to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_when_non_empty() {
        let settings = ClientSettings::default()
            .with_env_override(Some(" https://game.example.com ".into()));
        assert_eq!(settings.base_url, "https://game.example.com");

        let settings = ClientSettings::default().with_env_override(Some("  ".into()));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: ClientSettings =
            serde_json::from_str(r#"{ "base_url": "http://10.0.0.2:3001" }"#).unwrap();
        assert_eq!(settings.base_url, "http://10.0.0.2:3001");
        assert_eq!(settings.retry_attempts, 3);
        assert_eq!(settings.genre, "fantasy");
    }

    #[test]
    fn player_id_is_generated_once() {
        let mut settings = ClientSettings::default();
        assert!(settings.ensure_player_id());
        let id = settings.player_id.clone();
        assert!(!settings.ensure_player_id());
        assert_eq!(settings.player_id, id);
    }
}
