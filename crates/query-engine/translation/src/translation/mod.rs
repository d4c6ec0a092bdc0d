//! Translate a filter document into a SQL predicate.

pub mod error;
pub mod filter;
