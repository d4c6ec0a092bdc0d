//! Render SQL templates with safely quoted identifiers and escaped literal values.

pub mod dialect;
pub mod format;
pub mod string;
pub mod value;
