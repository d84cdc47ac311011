//! Duplicate creation suppression.
//!
//! Requests from the same client inside the same coarse time window share a
//! key; the first result stored under a key is returned for the rest.
//! Capacity is bounded with oldest-insertion eviction.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::domain::foundation::Timestamp;

pub struct DedupCache<V> {
    window_secs: u64,
    capacity: usize,
    state: Mutex<DedupState<V>>,
}

struct DedupState<V> {
    order: VecDeque<String>,
    entries: HashMap<String, V>,
}

impl<V: Clone> DedupCache<V> {
    /// Zero window or capacity is raised to one.
    pub fn new(window_secs: u64, capacity: usize) -> Self {
        Self {
            window_secs: window_secs.max(1),
            capacity: capacity.max(1),
            state: Mutex::new(DedupState {
                order: VecDeque::new(),
                entries: HashMap::new(),
            }),
        }
    }

    /// `sha256(client ":" floor(at / window))`, hex encoded.
    pub fn key(&self, client_identity: &str, at: Timestamp) -> String {
        let bucket = at.as_unix_secs() / self.window_secs;
        let mut hasher = Sha256::new();
        hasher.update(format!("{}:{}", client_identity, bucket).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.get(key).cloned()
    }

    /// Stores `value` under `key`, evicting the oldest entries past capacity.
    pub fn insert(&self, key: String, value: V) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.entries.insert(key.clone(), value).is_none() {
            state.order.push_back(key);
        }
        while state.order.len() > self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
