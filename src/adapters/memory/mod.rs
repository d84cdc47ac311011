//! In-memory store adapters.

mod in_memory_session_store;
mod in_memory_stats_store;

pub use in_memory_session_store::InMemorySessionStore;
pub use in_memory_stats_store::InMemoryStatsStore;
