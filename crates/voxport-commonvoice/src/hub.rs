//! Hugging Face hub access: credential verification and paged row fetching

use std::io;
use std::path::PathBuf;

use anyhow::Context;

use voxport_core::{RecordResult, SHARED_RUNTIME, StreamError, http_client};

use crate::config::Config;
use crate::rows::{RowsPage, map_row};

const HUB_API_BASE: &str = "https://huggingface.co/api";
const ROWS_API_BASE: &str = "https://datasets-server.huggingface.co";

/// Rows fetched per request.
pub const PAGE_LENGTH: usize = 100;

/// Verify the bearer credential against the hub, returning the account name.
///
/// Any failure here is fatal: the pipeline must not start consuming rows
/// with a missing or rejected credential.
pub fn verify_token(token: &str) -> anyhow::Result<String> {
    let url = format!("{HUB_API_BASE}/whoami-v2");
    let body: serde_json::Value = get_json(&url, token).context("credential rejected by hub")?;
    Ok(body
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("(unknown account)")
        .to_string())
}

/// Blocking GET returning parsed JSON. No retries: a failed request fails
/// the caller.
fn get_json<T: serde::de::DeserializeOwned>(url: &str, token: &str) -> Result<T, StreamError> {
    SHARED_RUNTIME.handle().block_on(async {
        let resp = http_client()
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| StreamError::from_reqwest(&e))?;
        resp.json::<T>()
            .await
            .map_err(|e| StreamError::from_reqwest(&e))
    })
}

/// Blocking GET returning the raw body, for page caching.
fn get_text(url: &str, token: &str) -> Result<String, StreamError> {
    SHARED_RUNTIME.handle().block_on(async {
        let resp = http_client()
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| StreamError::from_reqwest(&e))?;
        resp.text().await.map_err(|e| StreamError::from_reqwest(&e))
    })
}

/// Paged reader over the datasets-server `/rows` endpoint.
///
/// When a cache directory is configured, each page body is stored as
/// `rows_<offset>.json` under `<cache_dir>/<dataset>/<config>/<split>/` and
/// reused on later runs.
#[derive(Debug)]
pub struct RowPages {
    endpoint: String,
    token: String,
    cache_dir: Option<PathBuf>,
    offset: u64,
    total: Option<u64>,
    done: bool,
}

impl RowPages {
    pub fn new(config: &Config) -> Self {
        let endpoint = format!(
            "{ROWS_API_BASE}/rows?dataset={}&config={}&split={}",
            config.dataset, config.language, config.split
        );
        let cache_dir = config.cache_dir.as_ref().map(|dir| {
            dir.join(&config.dataset)
                .join(&config.language)
                .join(&config.split)
        });
        Self {
            endpoint,
            token: config.token.clone(),
            cache_dir,
            offset: 0,
            total: None,
            done: false,
        }
    }

    /// Total rows reported by the server, known after the first page.
    pub fn total_rows(&self) -> Option<u64> {
        self.total
    }

    /// Fetch the next page of raw rows. `Ok(None)` once exhausted.
    pub fn next_page(&mut self) -> Result<Option<Vec<serde_json::Value>>, StreamError> {
        if self.done {
            return Ok(None);
        }

        let page = self.fetch_page()?;
        if self.total.is_none() {
            self.total = page.num_rows_total;
        }

        let count = page.rows.len();
        self.offset += count as u64;
        // Short page, or reported total reached → exhausted
        if count < PAGE_LENGTH || self.total.is_some_and(|t| self.offset >= t) {
            self.done = true;
        }
        if count == 0 {
            return Ok(None);
        }

        Ok(Some(page.rows.into_iter().map(|r| r.row).collect()))
    }

    fn fetch_page(&self) -> Result<RowsPage, StreamError> {
        let body = match self.cached_body()? {
            Some(body) => body,
            None => {
                let url = format!(
                    "{}&offset={}&length={PAGE_LENGTH}",
                    self.endpoint, self.offset
                );
                let body = get_text(&url, &self.token)?;
                self.store_in_cache(&body)?;
                body
            }
        };

        serde_json::from_str(&body).map_err(|e| {
            StreamError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid rows page JSON: {e}"),
            ))
        })
    }

    fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("rows_{}.json", self.offset)))
    }

    fn cached_body(&self) -> Result<Option<String>, StreamError> {
        let Some(path) = self.cache_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        log::debug!("offset {}: using cached page", self.offset);
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn store_in_cache(&self, body: &str) -> Result<(), StreamError> {
        let Some(path) = self.cache_path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, body)?;
        Ok(())
    }
}

/// Lazily yields records from the hub, page by page.
///
/// A failed page fetch surfaces one record-level error and ends the stream;
/// the export still completes with a summary (no retries anywhere).
#[derive(Debug)]
pub struct HubRowSource {
    pages: RowPages,
    buffer: std::vec::IntoIter<serde_json::Value>,
}

impl HubRowSource {
    pub fn new(config: &Config) -> Self {
        Self {
            pages: RowPages::new(config),
            buffer: Vec::new().into_iter(),
        }
    }

    /// Total rows reported by the server, known after the first page.
    pub fn total_rows(&self) -> Option<u64> {
        self.pages.total_rows()
    }
}

impl Iterator for HubRowSource {
    type Item = RecordResult;

    fn next(&mut self) -> Option<RecordResult> {
        loop {
            if let Some(row) = self.buffer.next() {
                return Some(Ok(map_row(&row)));
            }
            match self.pages.next_page() {
                Ok(Some(rows)) => self.buffer = rows.into_iter(),
                Ok(None) => return None,
                Err(e) => {
                    self.pages.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
