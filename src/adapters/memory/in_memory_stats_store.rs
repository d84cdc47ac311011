//! In-Memory Stats Store Adapter
//!
//! One row per diagnosis, seeded from the configured catalogue. Unknown
//! diagnoses get a row on first use. Writers are serialized by the lock.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::DiagnosisStat;
use crate::ports::{StatsStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStatsStore {
    rows: Arc<RwLock<Vec<DiagnosisStat>>>,
}

impl InMemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with a zeroed row for each diagnosis.
    pub fn seeded<I, S>(diagnoses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows: Vec<DiagnosisStat> = Vec::new();
        for diagnosis in diagnoses {
            let diagnosis = diagnosis.into();
            if !rows.iter().any(|r| r.diagnosis == diagnosis) {
                rows.push(DiagnosisStat::new(diagnosis));
            }
        }
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn record_attempt(&self, diagnosis: &str, correct: bool) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.diagnosis == diagnosis) {
            Some(row) => row.record(correct),
            None => {
                let mut row = DiagnosisStat::new(diagnosis);
                row.record(correct);
                rows.push(row);
            }
        }
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<DiagnosisStat>, StoreError> {
        Ok(self.rows.read().await.clone())
    }
}
