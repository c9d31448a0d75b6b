//! Prompt domain
//!
//! Templates for the text sent to the planner and to synthesizing agents.

mod template;

pub use template::PromptTemplate;
