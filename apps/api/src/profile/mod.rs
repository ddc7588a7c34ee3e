//! User profile reads and updates.

pub mod handlers;
pub mod store;
