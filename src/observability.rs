use biometrics::{Collector, Counter, Moments};
use tracing_subscriber::EnvFilter;

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chatwidget.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("chatwidget.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chatwidget.client.request_duration_seconds");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("chatwidget.session.submissions");
pub(crate) static SESSION_IGNORED_SUBMISSIONS: Counter =
    Counter::new("chatwidget.session.ignored_submissions");
pub(crate) static SESSION_REPLIES: Counter = Counter::new("chatwidget.session.replies");
pub(crate) static SESSION_TRANSPORT_FAILURES: Counter =
    Counter::new("chatwidget.session.transport_failures");
pub(crate) static SESSION_EMPTY_RESULTS: Counter =
    Counter::new("chatwidget.session.empty_results");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_IGNORED_SUBMISSIONS);
    collector.register_counter(&SESSION_REPLIES);
    collector.register_counter(&SESSION_TRANSPORT_FAILURES);
    collector.register_counter(&SESSION_EMPTY_RESULTS);
}

/// The log filter for a front end that shares its terminal with the chat.
///
/// `directives` is the value of `RUST_LOG`.  Without it, or when it does not parse, logging is
/// off so that error detail never lands next to the apology shown to the user.
pub fn diagnostics_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("off"))
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn diagnostics_off_without_rust_log() {
        assert_eq!(diagnostics_filter(None).max_level_hint(), Some(LevelFilter::OFF));
    }

    #[test]
    fn rust_log_enables_diagnostics() {
        assert_eq!(
            diagnostics_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            diagnostics_filter(Some("error")).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
    }
}
