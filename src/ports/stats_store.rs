//! Stats Store Port - Per-diagnosis attempt and success counters.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::dialogue::DiagnosisStat;

#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Records one finished game for `diagnosis`.
    async fn record_attempt(&self, diagnosis: &str, correct: bool) -> Result<(), StoreError>;

    /// Current counters, one row per known diagnosis.
    async fn snapshot(&self) -> Result<Vec<DiagnosisStat>, StoreError>;
}
