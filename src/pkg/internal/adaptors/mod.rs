pub mod documents;
pub mod evaluations;
pub mod jobs;
pub mod settings;
