//! Resume Ingestion Pipeline — document storage, text extraction, suitability
//! scoring, AI classification, and the post-ingest bootstrap apply batch.

pub mod ats;
pub mod extract;
pub mod handlers;
pub mod pipeline;
pub mod skills;
