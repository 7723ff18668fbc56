//! Subscriber setup for the command-line tools.
//!
//! Log output goes to stderr so it never interleaves with CSV on stdout.
//! `RUST_LOG` overrides the directives passed in.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter for the binaries.
pub const DEFAULT_DIRECTIVES: &str = "info,tweep_followers=info";

fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

/// Install the global subscriber, human-readable when `pretty` and JSON
/// lines otherwise. Call once, before any work starts.
pub fn setup_logging(directives: &str, pretty: bool) {
    if pretty {
        setup_logging_pretty(directives);
    } else {
        setup_logging_json(directives);
    }
}

fn setup_logging_json(directives: &str) {
    let main_layer = tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_target(false)
        .with_line_number(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(env_filter(directives))
        .with(main_layer)
        .init();
}

fn setup_logging_pretty(directives: &str) {
    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(env_filter(directives))
        .with(main_layer)
        .init();
}
