use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use log::{info, warn};
use thiserror::Error;

use crate::acquire::sources::{SourceGroup, FALLBACK_SOURCES, PRIMARY_SOURCES};
use crate::catalog::{parse_records, Catalog, OrbitModel, ELEMENT_FILE_EXT};

/// CelesTrak answers some bad requests with HTTP 200 and a marker phrase
/// in the body instead of an error status.
const FAILURE_MARKERS: [&str; 2] = ["Invalid query", "No GP data found"];

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source label of the merged online catalog.
pub const COMBINED_LABEL: &str = "combined";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),
}

/// One remote fetch. Kept behind a trait so tests can script responses.
pub trait Fetcher {
    fn fetch(&self, source: SourceGroup) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher.
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, source: SourceGroup) -> Result<String, FetchError> {
        let response = ureq::get(&source.url())
            .timeout(FETCH_TIMEOUT)
            .call()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        response
            .into_string()
            .map_err(|e| FetchError::Http(e.to_string()))
    }
}

/// Orchestrates the ordered multi-source fetch, the name-keyed merge, and
/// the cache writes.
pub struct Coordinator<F: Fetcher = HttpFetcher> {
    fetcher: F,
    cache_dir: PathBuf,
}

impl Coordinator<HttpFetcher> {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self::with_fetcher(HttpFetcher, cache_dir)
    }
}

impl<F: Fetcher> Coordinator<F> {
    pub fn with_fetcher(fetcher: F, cache_dir: PathBuf) -> Self {
        Self { fetcher, cache_dir }
    }

    /// Fetches the primary sources in order and merges them by object
    /// name, later sources overwriting earlier entries. When every primary
    /// source fails, the fallback list gets one round. Total failure is an
    /// empty catalog, never an error: the caller owns the local-cache
    /// fallback policy.
    pub fn acquire(&self, combine: bool) -> Catalog {
        if !combine {
            return self.acquire_first_primary();
        }

        let mut merged = BTreeMap::new();
        self.merge_sources(&PRIMARY_SOURCES, &mut merged);
        if merged.is_empty() {
            warn!("All primary sources failed, trying fallback sources");
            self.merge_sources(&FALLBACK_SOURCES, &mut merged);
        }

        let mut catalog = Catalog::new();
        if merged.is_empty() {
            warn!("No element data could be acquired from any source");
        } else {
            self.write_combined_snapshot(&merged);
            catalog.push_source(COMBINED_LABEL, merged);
        }
        catalog
    }

    fn merge_sources(&self, sources: &[SourceGroup], merged: &mut BTreeMap<String, OrbitModel>) {
        for &source in sources {
            let Some(body) = self.fetch_source(source) else {
                continue;
            };
            self.write_raw_cache(source, &body);

            let report = parse_records(&body);
            if report.objects.is_empty() {
                warn!("No valid element records from {}", source.label());
                continue;
            }
            info!(
                "Fetched {} objects from {}",
                report.objects.len(),
                source.label()
            );
            // Later sources overwrite earlier entries of the same name.
            merged.extend(report.objects);
        }
    }

    fn acquire_first_primary(&self) -> Catalog {
        let source = PRIMARY_SOURCES[0];
        let mut catalog = Catalog::new();
        let Some(body) = self.fetch_source(source) else {
            return catalog;
        };
        self.write_raw_cache(source, &body);

        let report = parse_records(&body);
        if report.objects.is_empty() {
            warn!("No valid element records from {}", source.label());
            return catalog;
        }
        info!(
            "Fetched {} objects from {}",
            report.objects.len(),
            source.label()
        );
        catalog.push_source(source.label(), report.objects);
        catalog
    }

    /// A failed source is logged and skipped; there are no retries.
    fn fetch_source(&self, source: SourceGroup) -> Option<String> {
        match self.fetcher.fetch(source) {
            Ok(body) => {
                if FAILURE_MARKERS.iter().any(|marker| body.contains(marker)) {
                    warn!("Source {} rejected the query", source.label());
                    None
                } else {
                    Some(body)
                }
            }
            Err(e) => {
                warn!("Fetch failed for {}: {}", source.label(), e);
                None
            }
        }
    }

    /// Persists a raw response body as `<label>_<timestamp>.tle`. Cache
    /// write failures are logged, not fatal.
    fn write_raw_cache(&self, source: SourceGroup, body: &str) {
        self.write_cache_file(source.label(), body);
    }

    /// Persists the merged records re-serialized as (name, line1, line2)
    /// triples, so offline runs can load one coherent snapshot.
    fn write_combined_snapshot(&self, merged: &BTreeMap<String, OrbitModel>) {
        let mut text = String::new();
        for model in merged.values() {
            text.push_str(&model.record.name);
            text.push('\n');
            text.push_str(&model.record.line1);
            text.push('\n');
            text.push_str(&model.record.line2);
            text.push('\n');
        }
        self.write_cache_file(COMBINED_LABEL, &text);
    }

    fn write_cache_file(&self, label: &str, content: &str) {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let path = self
            .cache_dir
            .join(format!("{}_{}.{}", label, stamp, ELEMENT_FILE_EXT));
        let result = fs::create_dir_all(&self.cache_dir).and_then(|_| fs::write(&path, content));
        match result {
            Ok(()) => info!("Cached {}", path.display()),
            Err(e) => warn!("Could not cache {}: {}", path.display(), e),
        }
    }
}
