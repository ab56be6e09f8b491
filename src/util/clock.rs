use time::OffsetDateTime;

/// Current wall-clock time as a unix epoch in whole seconds.
///
/// All persisted timestamps (`created`, `publish_date`) use this resolution.
pub fn now_epoch() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
