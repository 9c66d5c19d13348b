// src/state.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use tracing::info;

use crate::{
    cache::{Clock, FreshnessCache, SystemClock},
    config::Config,
    export::PdfFont,
    fetch::{HttpSource, TableSource},
};

pub struct AppState<S> {
    pub cache: FreshnessCache<S>,
    pub pdf_font: PdfFont,
}

impl<S: TableSource> AppState<S> {
    pub fn new(cache: FreshnessCache<S>, pdf_font: PdfFont) -> Arc<Self> {
        Arc::new(Self { cache, pdf_font })
    }
}

impl AppState<HttpSource> {
    pub fn from_config(config: &Config) -> Result<Arc<Self>> {
        let source = HttpSource::new(config.sheet_url.clone(), config.fetch_timeout)
            .context("building HTTP client")?;
        let ttl = TimeDelta::from_std(config.cache_ttl).context("cache duration out of range")?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let pdf_font = match &config.pdf_font {
            Some(path) => {
                let font = PdfFont::from_file(path)?;
                info!(path = %path.display(), bytes = font.len(), "loaded PDF font");
                font
            }
            None => {
                info!("no PDF font configured, using bundled DejaVu Sans");
                PdfFont::bundled()
            }
        };

        info!(
            url = %config.sheet_url,
            ttl_secs = ttl.num_seconds(),
            timeout = ?config.fetch_timeout,
            "vote sheet source configured"
        );
        Ok(Self::new(FreshnessCache::new(source, clock, ttl), pdf_font))
    }
}
