//! Judge gateway adapters.
//!
//! - `OpenAiCompatibleGateway` - chat completions over HTTP
//! - `MockJudgeGateway` - scripted replies for tests

mod mock_gateway;
mod openai_gateway;

pub use mock_gateway::MockJudgeGateway;
pub use openai_gateway::{OpenAiCompatibleGateway, OpenAiGatewayConfig};
