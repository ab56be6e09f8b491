use crate::application::repos::RepoError;
use crate::domain::entities::OptionsMap;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed") => {
            RepoError::Duplicate {
                constraint: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("FOREIGN KEY constraint failed") => {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("constraint failed") => {
            RepoError::Integrity {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}

/// Serialize an option mapping for its TEXT column.
pub(super) fn encode_options(options: &OptionsMap) -> String {
    serde_json::to_string(options).unwrap_or_else(|_| String::from("{}"))
}

/// Decode a stored option blob. The empty string is a legacy "no value"
/// sentinel; anything else unparseable is logged and treated the same way.
pub(super) fn decode_options(raw: &str) -> OptionsMap {
    if raw.is_empty() {
        return OptionsMap::new();
    }
    match serde_json::from_str(raw) {
        Ok(options) => options,
        Err(err) => {
            tracing::warn!(error = %err, "stored options blob is not valid JSON; treating as empty");
            OptionsMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_blob_decodes_to_empty_mapping() {
        assert!(decode_options("").is_empty());
    }

    #[test]
    fn options_round_trip_through_text() {
        let mut options = OptionsMap::new();
        options.insert("template".into(), json!("wide"));
        options.insert("pages".into(), json!(["/", "/news"]));

        assert_eq!(decode_options(&encode_options(&options)), options);
    }

    #[test]
    fn garbage_blob_decodes_to_empty_mapping() {
        assert!(decode_options("a:1:{s:3:").is_empty());
    }
}
