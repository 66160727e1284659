pub mod tool_interface;
pub mod tavily_search;

pub use tool_interface::*;
pub use tavily_search::*;
