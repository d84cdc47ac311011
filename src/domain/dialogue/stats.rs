//! Per-diagnosis statistics.

use serde::{Deserialize, Serialize};

/// Attempt and success counters for one diagnosis.
///
/// `correct <= attempts` holds for every value built through [`DiagnosisStat::record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisStat {
    pub diagnosis: String,
    pub attempts: u64,
    pub correct: u64,
}

impl DiagnosisStat {
    pub fn new(diagnosis: impl Into<String>) -> Self {
        Self {
            diagnosis: diagnosis.into(),
            attempts: 0,
            correct: 0,
        }
    }

    /// Counts one finished game.
    pub fn record(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Share of attempts solved, 0.0 when never attempted.
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }
}
