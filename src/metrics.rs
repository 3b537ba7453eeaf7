use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_gauge, register_histogram, Counter, Gauge, Histogram,
};

lazy_static! {
    pub static ref MESSAGES_TOTAL: Counter = register_counter!(
        "phrasebot_messages_total",
        "Total text messages received"
    )
    .unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "phrasebot_rate_limited_total",
        "Messages rejected by the rate limiter"
    )
    .unwrap();
    pub static ref COMPLETIONS_TOTAL: Counter = register_counter!(
        "phrasebot_completions_total",
        "Completions returned to users"
    )
    .unwrap();
    pub static ref COMPLETION_FAILURES_TOTAL: Counter = register_counter!(
        "phrasebot_completion_failures_total",
        "Completion attempts that ended in any failure variant"
    )
    .unwrap();
    pub static ref COMPLETION_UNREACHABLE_TOTAL: Counter = register_counter!(
        "phrasebot_completion_unreachable_total",
        "Completion attempts that could not reach the backend or timed out"
    )
    .unwrap();
    pub static ref COMPLETION_UPSTREAM_ERRORS_TOTAL: Counter = register_counter!(
        "phrasebot_completion_upstream_errors_total",
        "Completion attempts answered with a non-2xx status"
    )
    .unwrap();
    pub static ref COMPLETION_MALFORMED_TOTAL: Counter = register_counter!(
        "phrasebot_completion_malformed_total",
        "Completion attempts answered with an empty or malformed payload"
    )
    .unwrap();
    pub static ref COMPLETION_INTERNAL_ERRORS_TOTAL: Counter = register_counter!(
        "phrasebot_completion_internal_errors_total",
        "Completion attempts that failed for an unclassified internal reason"
    )
    .unwrap();
    pub static ref COMPLETION_LATENCY: Histogram = register_histogram!(
        "phrasebot_completion_latency_seconds",
        "Inference call latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_IDENTITIES: Gauge = register_gauge!(
        "phrasebot_tracked_identities",
        "Identities currently holding a rate-limit window"
    )
    .unwrap();
}
