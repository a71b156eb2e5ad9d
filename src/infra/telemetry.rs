use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::site::{METRIC_RENDER_FALLBACK, METRIC_RENDER_MS};
use crate::cache::{METRIC_PAGE_BYPASS, METRIC_PAGE_HIT, METRIC_PAGE_MISS, METRIC_STORE_EVICT};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
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

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_PAGE_HIT,
            Unit::Count,
            "Total number of rendered pages served from the page cache."
        );
        describe_counter!(
            METRIC_PAGE_MISS,
            Unit::Count,
            "Total number of page cache misses."
        );
        describe_counter!(
            METRIC_PAGE_BYPASS,
            Unit::Count,
            "Total number of page cache lookups skipped by auto_cache_clear."
        );
        describe_counter!(
            METRIC_STORE_EVICT,
            Unit::Count,
            "Total number of cache store evictions due to capacity."
        );
        describe_counter!(
            METRIC_RENDER_FALLBACK,
            Unit::Count,
            "Total number of requests answered with the 404 fallback page."
        );
        describe_histogram!(
            METRIC_RENDER_MS,
            Unit::Milliseconds,
            "Page render latency in milliseconds, cache hits included."
        );
    });
}
