pub mod analysis;
pub mod config;
pub mod error;
pub mod prompt;
pub mod report;
pub mod simulation;
pub mod trajectory;
