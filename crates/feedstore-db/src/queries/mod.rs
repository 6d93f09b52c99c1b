//! Database query modules.

pub mod cache;
