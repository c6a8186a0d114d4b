pub mod answers;
pub mod prompt;
