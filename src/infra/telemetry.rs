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

pub const BLOG_INDEX_DOCUMENTS_DROPPED_TOTAL: &str = "gambit_blog_index_documents_dropped_total";
pub const BLOG_POST_NOT_FOUND_TOTAL: &str = "gambit_blog_post_not_found_total";
pub const BOOKING_SUBMISSIONS_TOTAL: &str = "gambit_booking_submissions_total";
pub const BOOKING_REJECTIONS_TOTAL: &str = "gambit_booking_rejections_total";

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

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            BLOG_INDEX_DOCUMENTS_DROPPED_TOTAL,
            Unit::Count,
            "Content files left out of the blog listing for lacking a title or date."
        );
        describe_counter!(
            BLOG_POST_NOT_FOUND_TOTAL,
            Unit::Count,
            "Post lookups that matched no content file."
        );
        describe_counter!(
            BOOKING_SUBMISSIONS_TOTAL,
            Unit::Count,
            "Booking forms that passed validation and produced a messaging link."
        );
        describe_counter!(
            BOOKING_REJECTIONS_TOTAL,
            Unit::Count,
            "Booking forms returned to the visitor with field errors."
        );
    });
}
