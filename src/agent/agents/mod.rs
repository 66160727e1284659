pub mod react_agent;

pub use react_agent::*;
