use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::Settings;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: IntCounter = register_int_counter!(
        "quiz_questions_served_total",
        "Number of questions handed out by the quiz"
    )
    .unwrap();
}

const FALLBACK_DIRECTIVE: &str = "info";

/// Parses a log filter directive such as `info,tower_http=debug`.
///
/// A directive that does not parse is replaced with `info`; the error is
/// returned alongside so it can be logged once a subscriber is installed.
fn log_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(err) => (
            EnvFilter::new(FALLBACK_DIRECTIVE),
            Some(format!("Invalid log level {directive:?}: {err}")),
        ),
    }
}

/// Installs the global subscriber configured by `log_level` and `span_events`.
pub fn init_tracing(settings: &Settings) {
    let (filter_layer, invalid) = log_filter(&settings.log_level);
    let fmt_layer = if settings.span_events {
        fmt::layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
    } else {
        fmt::layer()
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    if let Some(invalid) = invalid {
        tracing::warn!("{invalid}, falling back to {FALLBACK_DIRECTIVE:?}");
    }
}
