//! Terminal presentation: prompts, spinner and preview card

pub mod prompt;
pub mod render;
