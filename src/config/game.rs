//! Game rules configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::dialogue::DialoguePolicy;

/// Game rules, caches and session lifecycle
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Run the referee plausibility check on patient messages
    #[serde(default)]
    pub check_patient_response: bool,

    /// Gate diagnosis checks behind a keyword pre-filter
    #[serde(default)]
    pub use_keyword_diagnosis_check: bool,

    /// Diagnoses a new game may draw (comma-separated)
    #[serde(default = "default_diseases")]
    pub diseases: String,

    /// Doctor input limit, in characters
    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,

    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    #[serde(default = "default_max_plausibility_retries")]
    pub max_plausibility_retries: u32,

    /// Width of the duplicate new-game window
    #[serde(default = "default_dedup_window")]
    pub dedup_window_secs: u64,

    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,

    #[serde(default = "default_symptom_cache_capacity")]
    pub symptom_cache_capacity: usize,

    /// Idle time after which a session is dropped
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub session_sweep_interval_secs: u64,

    /// Directory for per-session conversation logs
    #[serde(default = "default_log_dir")]
    pub conversation_log_dir: String,
}

impl GameConfig {
    /// Trimmed, de-duplicated disease names in configured order
    pub fn diseases_list(&self) -> Vec<String> {
        let mut list: Vec<String> = Vec::new();
        for name in self.diseases.split(',').map(str::trim) {
            if !name.is_empty() && !list.iter().any(|d| d == name) {
                list.push(name.to_string());
            }
        }
        list
    }

    /// Engine switches
    pub fn dialogue_policy(&self) -> DialoguePolicy {
        DialoguePolicy {
            check_patient_response: self.check_patient_response,
            use_keyword_gate: self.use_keyword_diagnosis_check,
            max_turns: self.max_turns,
            max_plausibility_retries: self.max_plausibility_retries,
            max_input_length: self.max_input_length,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }

    /// Validate game configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.diseases_list().is_empty() {
            return Err(ValidationError::NoDiseases);
        }
        if self.max_turns == 0 {
            return Err(ValidationError::MustBePositive("game.max_turns"));
        }
        if self.max_input_length == 0 {
            return Err(ValidationError::MustBePositive("game.max_input_length"));
        }
        if self.dedup_window_secs == 0 {
            return Err(ValidationError::MustBePositive("game.dedup_window_secs"));
        }
        if self.dedup_capacity == 0 {
            return Err(ValidationError::MustBePositive("game.dedup_capacity"));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            check_patient_response: false,
            use_keyword_diagnosis_check: false,
            diseases: default_diseases(),
            max_input_length: default_max_input_length(),
            max_turns: default_max_turns(),
            max_plausibility_retries: default_max_plausibility_retries(),
            dedup_window_secs: default_dedup_window(),
            dedup_capacity: default_dedup_capacity(),
            symptom_cache_capacity: default_symptom_cache_capacity(),
            session_ttl_secs: default_session_ttl(),
            session_sweep_interval_secs: default_sweep_interval(),
            conversation_log_dir: default_log_dir(),
        }
    }
}

fn default_diseases() -> String {
    "流感,肺炎,胃溃疡,偏头痛,扁桃体炎,高血压,糖尿病,关节炎,哮喘,过敏性鼻炎".to_string()
}

fn default_max_input_length() -> usize {
    100
}

fn default_max_turns() -> u32 {
    20
}

fn default_max_plausibility_retries() -> u32 {
    3
}

fn default_dedup_window() -> u64 {
    5
}

fn default_dedup_capacity() -> usize {
    256
}

fn default_symptom_cache_capacity() -> usize {
    512
}

fn default_session_ttl() -> u64 {
    86_400
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_log_dir() -> String {
    "conversations".to_string()
}
