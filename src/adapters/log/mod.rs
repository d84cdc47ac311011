//! Conversation log adapters.

mod file_conversation_log;
mod in_memory_conversation_log;
mod tee_conversation_log;

pub use file_conversation_log::FileConversationLog;
pub use in_memory_conversation_log::InMemoryConversationLog;
pub use tee_conversation_log::TeeConversationLog;
