//! Shared domain enumerations aligned with persisted integer codes.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a list version.
///
/// Fixed when the version row is inserted and never changed afterward;
/// "editing" a list always creates a new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    Published,
    Preview,
}

impl VersionStatus {
    /// Integer code persisted in the `version.status` column.
    pub fn code(self) -> i64 {
        match self {
            VersionStatus::Published => 1,
            VersionStatus::Preview => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(VersionStatus::Published),
            2 => Some(VersionStatus::Preview),
            _ => None,
        }
    }
}
