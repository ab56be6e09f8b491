//! Domain layer types and invariants.

pub mod articles;
pub mod entities;
pub mod lists;
pub mod options;
pub mod text;
pub mod types;
