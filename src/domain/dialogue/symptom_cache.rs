//! Cache of initial symptom draws.
//!
//! The first patient turn seeds its greeting with a symptom hint drawn from
//! the judge. The draw is made once per (session, diagnosis); repeated starts
//! reuse the cached hint instead of paying for another call.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::domain::foundation::SessionId;

type HintKey = (SessionId, String);

#[derive(Debug, Default)]
struct HintSlots {
    order: VecDeque<HintKey>,
    hints: HashMap<HintKey, String>,
}

/// Bounded hint cache with oldest-insertion eviction.
#[derive(Debug)]
pub struct SymptomHintCache {
    capacity: usize,
    slots: Mutex<HintSlots>,
}

impl SymptomHintCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: Mutex::new(HintSlots::default()),
        }
    }

    pub fn get(&self, session_id: SessionId, diagnosis: &str) -> Option<String> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.hints.get(&(session_id, diagnosis.to_string())).cloned()
    }

    pub fn insert(&self, session_id: SessionId, diagnosis: &str, hint: impl Into<String>) {
        let key = (session_id, diagnosis.to_string());
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        if slots.hints.insert(key.clone(), hint.into()).is_some() {
            return;
        }
        slots.order.push_back(key);
        while slots.order.len() > self.capacity {
            if let Some(oldest) = slots.order.pop_front() {
                slots.hints.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_after_insert() {
        let cache = SymptomHintCache::new(4);
        let id = SessionId::new();
        cache.insert(id, "流感", "- 发热");
        assert_eq!(cache.get(id, "流感").as_deref(), Some("- 发热"));
        assert_eq!(cache.get(id, "肺炎"), None);
        assert_eq!(cache.get(SessionId::new(), "流感"), None);
    }

    #[test]
    fn evicts_oldest_insertion() {
        let cache = SymptomHintCache::new(2);
        let (a, b, c) = (SessionId::new(), SessionId::new(), SessionId::new());
        cache.insert(a, "流感", "a");
        cache.insert(b, "流感", "b");
        cache.insert(c, "流感", "c");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(a, "流感"), None);
        assert!(cache.get(b, "流感").is_some());
        assert!(cache.get(c, "流感").is_some());
    }

    #[test]
    fn reinsert_does_not_grow() {
        let cache = SymptomHintCache::new(2);
        let id = SessionId::new();
        cache.insert(id, "流感", "first");
        cache.insert(id, "流感", "second");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(id, "流感").as_deref(), Some("second"));
    }
}
