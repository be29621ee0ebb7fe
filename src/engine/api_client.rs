use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::settings::ClientSettings;
use crate::engine::fallback;
use crate::engine::transport::{HttpRequest, HttpTransport, Method, Transport};
use crate::error::ApiError;
use crate::model::api::{
    CameoAcceptRequest, CameoAcceptResponse, CameoInvite, CameoInviteRequest, CombatRequest,
    CombatResponse, InitializeRequest, InitializeResponse, PuzzleRecord, PuzzleResult,
    PuzzleSession, PuzzleStartRequest, PuzzleSubmitRequest, StoryRequest, StoryResponse,
};
use crate::model::game_save::{LoadedSave, RenameRequest, SaveAck, SaveRequest, SaveSummary};

/// Fixed attempt count with linear backoff: the wait after attempt `n`
/// is `n × delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.delay.saturating_mul(attempt)
    }
}

pub struct ApiClient {
    transport: Box<dyn Transport>,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(transport: Box<dyn Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(
            Box::new(HttpTransport::new(&settings.base_url)),
            settings.retry_policy(),
        )
    }

    fn send_with_retry(&self, operation: &str, request: &HttpRequest) -> Result<Value, ApiError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.transport.send(request) {
                Ok(body) => {
                    if attempt > 1 {
                        info!(attempt, operation, "request succeeded after retry");
                    }
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        operation,
                        "request failed, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
                Err(e) => {
                    error!(attempts = attempt, error = %e, operation, "request failed");
                    return Err(e);
                }
            }
        }
    }

    fn call<T: DeserializeOwned>(&self, operation: &str, request: HttpRequest) -> Result<T, ApiError> {
        let body = self.send_with_retry(operation, &request)?;
        Ok(serde_json::from_value(body)?)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &str,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.call(operation, HttpRequest::post(segments, body))
    }

    /* =========================
       Narrative (never fails)
       ========================= */

    pub fn initialize_game(&self, request: &InitializeRequest) -> InitializeResponse {
        match self.post::<_, InitializeResponse>("initialize", &["api", "initialize"], request) {
            Ok(mut resp) => {
                resp.is_fallback = false;
                resp
            }
            Err(e) => {
                warn!(error = %e, "initialize unavailable, using offline opening");
                fallback::initialize(request)
            }
        }
    }

    pub fn generate_story(&self, request: &StoryRequest) -> StoryResponse {
        match self.post::<_, StoryResponse>("story", &["api", "story"], request) {
            Ok(mut resp) => {
                resp.is_fallback = false;
                resp
            }
            Err(e) => {
                warn!(error = %e, "story unavailable, using offline narration");
                fallback::story(request)
            }
        }
    }

    pub fn resolve_combat(&self, request: &CombatRequest) -> CombatResponse {
        match self.post::<_, CombatResponse>("combat", &["api", "combat"], request) {
            Ok(mut resp) => {
                resp.is_fallback = false;
                resp
            }
            Err(e) => {
                warn!(error = %e, "combat unavailable, resolving locally");
                fallback::combat(request)
            }
        }
    }

    /* =========================
       Saves
       ========================= */

    pub fn list_saves(&self, player_id: &str) -> Result<Vec<SaveSummary>, ApiError> {
        let body = self.send_with_retry("list_saves", &HttpRequest::get(&["api", "saves", player_id]))?;
        let list = match body {
            Value::Object(mut obj) => obj.remove("saves").unwrap_or(Value::Array(Vec::new())),
            other => other,
        };
        Ok(serde_json::from_value(list)?)
    }

    pub fn save_game(&self, request: &SaveRequest) -> Result<SaveAck, ApiError> {
        self.post("save", &["api", "save"], request)
    }

    pub fn load_save(&self, save_id: &str) -> Result<LoadedSave, ApiError> {
        let body = self.send_with_retry("load", &HttpRequest::get(&["api", "load", save_id]))?;
        Ok(LoadedSave::from_body(body))
    }

    pub fn load_save_by_name(&self, name: &str) -> Result<LoadedSave, ApiError> {
        let request = HttpRequest::get(&["api", "load", "by-name"]).with_query("name", name);
        let body = self.send_with_retry("load_by_name", &request)?;
        Ok(LoadedSave::from_body(body))
    }

    pub fn rename_save(&self, save_id: &str, name: &str) -> Result<(), ApiError> {
        let body = serde_json::to_value(RenameRequest { name: name.to_string() })?;
        let request = HttpRequest::new(Method::Patch, &["api", "saves", save_id]).with_body(body);
        self.send_with_retry("rename_save", &request).map(|_| ())
    }

    pub fn delete_save(&self, save_id: &str) -> Result<(), ApiError> {
        let request = HttpRequest::new(Method::Delete, &["api", "saves", save_id]);
        self.send_with_retry("delete_save", &request).map(|_| ())
    }

    /* =========================
       Arcade
       ========================= */

    pub fn start_puzzle(&self, request: &PuzzleStartRequest) -> Result<PuzzleSession, ApiError> {
        self.post("start_puzzle", &["api", "minigames", "puzzles", "start"], request)
    }

    pub fn submit_puzzle(&self, request: &PuzzleSubmitRequest) -> Result<PuzzleResult, ApiError> {
        self.post("submit_puzzle", &["api", "minigames", "puzzles", "submit"], request)
    }

    pub fn puzzle_history(&self, player_id: &str) -> Result<Vec<PuzzleRecord>, ApiError> {
        let request =
            HttpRequest::get(&["api", "minigames", "puzzles"]).with_query("playerId", player_id);
        let body = self.send_with_retry("puzzle_history", &request)?;
        let list = match body {
            Value::Object(mut obj) => obj.remove("puzzles").unwrap_or(Value::Array(Vec::new())),
            other => other,
        };
        Ok(serde_json::from_value(list)?)
    }

    /* =========================
       Cameos
       ========================= */

    pub fn create_cameo_invite(&self, request: &CameoInviteRequest) -> Result<CameoInvite, ApiError> {
        self.post("cameo_invite", &["api", "cameo", "invite"], request)
    }

    pub fn accept_cameo_invite(
        &self,
        request: &CameoAcceptRequest,
    ) -> Result<CameoAcceptResponse, ApiError> {
        self.post("cameo_accept", &["api", "cameo", "accept"], request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::GameStore;
    use crate::model::player::{CharacterClass, NewCharacter};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Fails `failures` times, then answers with `body`.
    struct FlakyTransport {
        calls: Arc<AtomicU32>,
        failures: u32,
        body: Value,
    }

    impl Transport for FlakyTransport {
        fn send(&self, _request: &HttpRequest) -> Result<Value, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(ApiError::Network("connection refused".into()))
            } else {
                Ok(self.body.clone())
            }
        }
    }

    fn client(failures: u32, body: Value) -> (ApiClient, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let transport = FlakyTransport {
            calls: Arc::clone(&calls),
            failures,
            body,
        };
        let retry = RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
        };
        (ApiClient::new(Box::new(transport), retry), calls)
    }

    fn story_request() -> StoryRequest {
        let mut store = GameStore::new();
        store.create_character(NewCharacter {
            name: "Kael".into(),
            class: CharacterClass::Rogue,
            gender: String::new(),
        });
        StoryRequest {
            player: store.player().cloned().unwrap(),
            genre: "fantasy".into(),
            previous_events: Vec::new(),
            choice: "Sneak past the guards".into(),
            game_state: Default::default(),
            active_quest: None,
            current_location: None,
            language: "en".into(),
        }
    }

    #[test]
    fn story_falls_back_after_three_attempts() {
        let (client, calls) = client(u32::MAX, Value::Null);
        let resp = client.generate_story(&story_request());
        assert!(resp.is_fallback);
        assert!(!resp.story.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn story_recovers_on_third_attempt() {
        let (client, calls) = client(2, json!({ "story": "The guards never notice.", "choices": ["Go on"] }));
        let resp = client.generate_story(&story_request());
        assert!(!resp.is_fallback);
        assert_eq!(resp.story, "The guards never notice.");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn saves_propagate_the_last_error() {
        let (client, calls) = client(u32::MAX, Value::Null);
        let err = client.delete_save("save_1").unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn decode_errors_are_not_retried() {
        let (client, calls) = client(0, json!("not a list"));
        let err = client.list_saves("player_1").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn save_list_accepts_wrapped_or_bare() {
        let summary = json!({ "id": "s1", "name": "Camp", "playerName": "Kael", "level": 3, "version": 2 });
        let (bare, _) = client(0, json!([summary.clone()]));
        let (wrapped, _) = client(0, json!({ "saves": [summary] }));
        assert_eq!(bare.list_saves("p").unwrap(), wrapped.list_saves("p").unwrap());
        assert_eq!(bare.list_saves("p").unwrap()[0].level, 3);
    }

    #[test]
    fn backoff_is_linear() {
        let retry = RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(250),
        };
        assert_eq!(retry.delay_after(1), Duration::from_millis(250));
        assert_eq!(retry.delay_after(2), Duration::from_millis(500));
    }
}
