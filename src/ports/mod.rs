//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue domain and the outside world. Adapters implement these ports.
//!
//! - `JudgeGateway` - language model behind the patient, body and referee roles
//! - `SessionStore` - keyed session persistence
//! - `StatsStore` - per-diagnosis attempt counters
//! - `ConversationLog` - per-session audit trail

mod conversation_log;
mod judge_gateway;
mod session_store;
mod stats_store;

pub use conversation_log::{ConversationLog, LogEntry, LogError};
pub use judge_gateway::{JudgeError, JudgeErrorKind, JudgeGateway, JudgeRequest, JudgeTask};
pub use session_store::{SessionStore, StoreError};
pub use stats_store::StatsStore;
