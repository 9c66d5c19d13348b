//! Per-user voting report over a published spreadsheet.
//!
//! The sheet's CSV export is fetched on demand and memoized for a short
//! window. Each request filters the table to one `user_id`, counts yes/no
//! votes, and lists the rows still marked "no" as an HTML page or as an
//! Excel/PDF download.
//!
//! Request flow: [`routes`] → [`cache::FreshnessCache`] (→ [`fetch::HttpSource`]
//! on expiry) → [`report::build_report`] → [`render`] or [`export`].

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod render;
pub mod report;
pub mod routes;
pub mod server;
pub mod state;
pub mod table;

/// Install the fmt subscriber used by the server and the CLI tools.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,votereport=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
}
