// src/config.rs

use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use url::Url;

use crate::cache::CACHE_DURATION_SECS;

/// CSV export of the voting sheet.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1udZCCmDPq-RXW1jdNnHLrH_at-4hMUbvpZ0IUQZxIRg/gviz/tq?tqx=out:csv";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub sheet_url: Url,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    /// Overrides the bundled PDF font.
    pub pdf_font: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; `load` reads the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let sheet_url: String = try_load(&lookup, "VOTEREPORT_SHEET_URL", DEFAULT_SHEET_URL)?;
        let sheet_url = Url::parse(&sheet_url)
            .with_context(|| format!("VOTEREPORT_SHEET_URL is not a valid URL: {}", sheet_url))?;

        let cache_secs: u64 =
            try_load(&lookup, "VOTEREPORT_CACHE_SECS", &CACHE_DURATION_SECS.to_string())?;
        let timeout_secs: u64 = try_load(
            &lookup,
            "VOTEREPORT_FETCH_TIMEOUT_SECS",
            &DEFAULT_FETCH_TIMEOUT_SECS.to_string(),
        )?;
        if timeout_secs == 0 {
            return Err(anyhow!("VOTEREPORT_FETCH_TIMEOUT_SECS must be positive"));
        }

        Ok(Self {
            host: try_load(&lookup, "VOTEREPORT_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "VOTEREPORT_PORT", "10000")?,
            sheet_url,
            cache_ttl: Duration::from_secs(cache_secs),
            fetch_timeout: Duration::from_secs(timeout_secs),
            pdf_font: lookup("VOTEREPORT_PDF_FONT")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn address(&self) -> Result<SocketAddr> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .with_context(|| format!("invalid listen address {}", address))
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("environment misconfigured: {key}={raw:?}: {e}")
    })
}
