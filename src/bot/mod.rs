mod quiz;
mod runner;

pub use quiz::{Quiz, QUESTIONS_DB, QUIZ_PROMPT};
pub use runner::{run, Runner};
