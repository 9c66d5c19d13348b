// src/fetch/mod.rs

use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::table::Table;

pub mod parse;

pub use parse::{parse_table, ParseError};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Anything that can produce a fresh copy of the vote table.
pub trait TableSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Table, FetchError>> + Send;
}

/// Downloads the sheet's CSV export over HTTP.
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl TableSource for HttpSource {
    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Table, FetchError> {
        let start = Instant::now();
        let url = self.url.to_string();

        // 1) request
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "sheet fetch rejected");
            return Err(FetchError::Status { url, status });
        }

        // 2) body
        let body = resp.bytes().await.map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;
        debug!(bytes = body.len(), "sheet body received");

        // 3) decode
        let table = parse_table(&body)?;
        if table.is_empty() {
            warn!(url = %self.url, "vote sheet has a header row but no data");
        }
        info!(
            rows = table.len(),
            elapsed = ?start.elapsed(),
            "fetched vote sheet"
        );
        Ok(table)
    }
}
