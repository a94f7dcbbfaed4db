use prometheus::{register_int_counter_vec, IntCounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUESTION_CHANGES_CNTR: IntCounterVec = register_int_counter_vec!(
        "trivia_question_changes_total",
        "Number of created and deleted questions",
        &["change"]
    )
    .unwrap();
    pub static ref QUIZ_ROUNDS_CNTR: IntCounterVec = register_int_counter_vec!(
        "trivia_quiz_rounds_total",
        "Number of served quiz rounds",
        &["category", "outcome"]
    )
    .unwrap();
}

// sqlx logs every statement at info
const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn";

/// Installs the global subscriber.
///
/// `LOG_LEVEL` takes `EnvFilter` directives and falls back to
/// [`DEFAULT_DIRECTIVES`] when unset or unparsable. `INCLUDE_SPAN_EVENTS=true`
/// also logs when spans open and close, which makes the per-request spans of
/// the HTTP trace layer visible.
pub fn init_tracing() -> Result<(), TryInitError> {
    let span_events = if env_flag("INCLUDE_SPAN_EVENTS") {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let fmt_layer = fmt::layer().with_span_events(span_events);
    let filter_layer = log_filter(std::env::var("LOG_LEVEL").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| value.eq_ignore_ascii_case("true"))
}

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
