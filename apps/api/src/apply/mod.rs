//! Apply Engine — quota enforcement, dedup, match scoring, and application
//! persistence.

pub mod engine;
pub mod handlers;
pub mod scoring;
