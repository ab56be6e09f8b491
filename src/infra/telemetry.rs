use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let level = logging
        .level_filter()
        .map_err(|err| InfraError::telemetry(err.to_string()))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "edicola_cache_hit_total",
            Unit::Count,
            "Total number of cache gateway hits."
        );
        describe_counter!(
            "edicola_cache_miss_total",
            Unit::Count,
            "Total number of cache gateway misses."
        );
        describe_counter!(
            "edicola_cache_invalidate_total",
            Unit::Count,
            "Total number of explicit cache invalidations."
        );
        describe_counter!(
            "edicola_list_props_hit_total",
            Unit::Count,
            "Cached list metadata reads served without a store round trip."
        );
        describe_counter!(
            "edicola_list_props_miss_total",
            Unit::Count,
            "List metadata reads that fell through to the store."
        );
        describe_counter!(
            "edicola_published_bundle_hit_total",
            Unit::Count,
            "Published bundle reads served from cache."
        );
        describe_counter!(
            "edicola_published_bundle_miss_total",
            Unit::Count,
            "Published bundle reads rebuilt from the store."
        );
    });
}
