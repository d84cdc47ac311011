//! GetStatsHandler - Per-diagnosis attempt counters.

use std::sync::Arc;

use crate::domain::dialogue::{DiagnosisStat, GameError};
use crate::ports::StatsStore;

pub struct GetStatsHandler {
    stats: Arc<dyn StatsStore>,
}

impl GetStatsHandler {
    pub fn new(stats: Arc<dyn StatsStore>) -> Self {
        Self { stats }
    }

    pub async fn handle(&self) -> Result<Vec<DiagnosisStat>, GameError> {
        Ok(self.stats.snapshot().await?)
    }
}
