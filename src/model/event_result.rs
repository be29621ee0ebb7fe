use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectOutcome {
    Applied,
    Rejected { reason: String },
    Deferred { reason: String },
}

/// One piece of an API response and what happened when it was fed into
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectApplication {
    pub effect: String,
    pub outcome: EffectOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub applications: Vec<EffectApplication>,
}

impl ApplyReport {
    pub fn applied(&mut self, effect: impl Into<String>) {
        self.push(effect, EffectOutcome::Applied);
    }

    pub fn rejected(&mut self, effect: impl Into<String>, reason: impl Into<String>) {
        self.push(effect, EffectOutcome::Rejected { reason: reason.into() });
    }

    pub fn deferred(&mut self, effect: impl Into<String>, reason: impl Into<String>) {
        self.push(effect, EffectOutcome::Deferred { reason: reason.into() });
    }

    fn push(&mut self, effect: impl Into<String>, outcome: EffectOutcome) {
        self.applications.push(EffectApplication {
            effect: effect.into(),
            outcome,
        });
    }

    pub fn is_applied(&self, effect: &str) -> bool {
        self.applications
            .iter()
            .any(|a| a.effect == effect && a.outcome == EffectOutcome::Applied)
    }
}
