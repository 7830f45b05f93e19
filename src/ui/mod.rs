/// Terminal presentation: prompts and raw trip pages.
pub mod prompt;
pub mod table;
