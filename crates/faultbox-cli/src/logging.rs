//! Tracing subscriber setup.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single lines.
    #[default]
    Compact,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Directives used when `RUST_LOG` is not set.
pub const fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "faultbox=debug,tower_http=debug"
    } else {
        "faultbox=info,tower_http=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Install the global subscriber.
///
/// Span close events are emitted so the named endpoint and service spans
/// log their duration.
pub fn init_tracing(format: LogFormat, verbose: bool) -> anyhow::Result<()> {
    let compact = (format == LogFormat::Compact).then(|| {
        tracing_subscriber::fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .compact()
    });
    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .with_current_span(true)
    });

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(compact)
        .with(json)
        .try_init()?;
    Ok(())
}
