//! Job Source Adapter — provider search, normalization, catalog upsert,
//! and the deterministic fallback path.

pub mod handlers;
pub mod query;
pub mod source;
