pub mod agent_factory;
pub mod error;
pub mod invoke;
pub mod message;

pub mod agents;
pub mod stateless_llm;
pub mod tools;

pub use agent_factory::*;
pub use error::AgentError;
pub use invoke::ask_agent;
pub use message::*;
