//! Infrastructure adapters and runtime bootstrap.

pub mod cache;
pub mod content_refs;
pub mod db;
pub mod error;
pub mod telemetry;
