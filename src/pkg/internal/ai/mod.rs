pub mod parse;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod retry;
pub mod spec;
