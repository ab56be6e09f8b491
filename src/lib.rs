//! Edicola is a versioned article-list store.
//!
//! A list is a named, editorially curated collection of articles. Every save
//! appends an immutable version snapshot (tagged preview or published) rather
//! than mutating earlier state; superseded previews and old published
//! snapshots are pruned on each write. Articles within a version form a
//! two-level tree persisted as flat rows, and the hot read path (the latest
//! published snapshot) is memoized through a write-through cache gateway.
//!
//! Layers follow the usual split: `domain` holds entities and pure codec
//! logic, `application` holds the repository/cache contracts and the
//! component services, `infra` holds the SQLite and in-memory adapters.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
