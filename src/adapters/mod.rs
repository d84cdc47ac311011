//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Judge gateways (OpenAI-compatible HTTP, scripted mock)
//! - `http` - axum transport for the game operations
//! - `log` - Conversation logs (in-memory, file, tee)
//! - `memory` - In-memory session and stats stores

pub mod ai;
pub mod http;
pub mod log;
pub mod memory;
