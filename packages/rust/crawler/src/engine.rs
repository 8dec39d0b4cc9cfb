//! Concurrent harvest engine.
//!
//! One run: discover the CELEX universe, scan the store for already
//! processed identifiers, diff, then fan the remaining work units out
//! across a bounded pool. Every failure inside a unit is contained to
//! that (identifier, language) attempt.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use lexharvest_discovery::{DiscoveryOptions, discover};
use lexharvest_shared::{CelexId, HarvestConfig, LexHarvestError, Result};
use lexharvest_storage::{Store, delta};

use crate::extract::{NOT_FOUND_PHRASE, extract_text};

/// User-Agent string for document requests.
const USER_AGENT: &str = concat!("LexHarvest/", env!("CARGO_PKG_VERSION"));

/// Maximum redirects to follow per document request.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// HarvestResult
// ---------------------------------------------------------------------------

/// Summary of a completed harvest run.
#[derive(Debug, Clone, Default)]
pub struct HarvestResult {
    /// Work units dispatched (identifiers in the delta).
    pub units: usize,
    /// Document artifacts written.
    pub documents_written: usize,
    /// (identifier, language) pairs the service has no rendition for.
    pub not_found: usize,
    /// Failed fetch or write attempts (error markers written).
    pub errors: usize,
    /// Total duration of the run.
    pub duration: Duration,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting harvest status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a work unit finishes (all its languages attempted).
    fn unit_done(&self, id: &CelexId, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, result: &HarvestResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn unit_done(&self, _id: &CelexId, _current: usize, _total: usize) {}
    fn done(&self, _result: &HarvestResult) {}
}

// ---------------------------------------------------------------------------
// Harvester
// ---------------------------------------------------------------------------

/// Per-unit outcome counters, merged into the run summary.
#[derive(Debug, Default)]
struct UnitOutcome {
    written: usize,
    not_found: usize,
    errors: usize,
}

/// Concurrent document harvester.
#[derive(Debug)]
pub struct Harvester {
    config: HarvestConfig,
    client: Client,
}

impl Harvester {
    /// Create a new harvester with the given configuration.
    pub fn new(config: HarvestConfig) -> Result<Self> {
        Url::parse(&config.document_base).map_err(|e| {
            LexHarvestError::config(format!(
                "invalid document base URL {}: {e}",
                config.document_base
            ))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LexHarvestError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Run a full harvest against `store`.
    ///
    /// A failed discovery is not an error: the run terminates cleanly
    /// with an empty summary. Errors inside work units never propagate
    /// here; they surface as markers, logs, and counters.
    #[instrument(skip_all, fields(root = ?store.root()))]
    pub async fn run(&self, store: &Store, progress: &dyn ProgressReporter) -> Result<HarvestResult> {
        let start = Instant::now();

        store.ensure_root()?;

        progress.phase("Discovering identifier universe");
        let opts = DiscoveryOptions::new(&self.config.sparql_url);
        let universe = match discover(&opts).await {
            Ok(ids) => ids,
            Err(LexHarvestError::Discovery(msg)) => {
                error!(error = %msg, "identifier discovery unavailable, nothing to do this run");
                let result = HarvestResult {
                    duration: start.elapsed(),
                    ..Default::default()
                };
                progress.done(&result);
                return Ok(result);
            }
            Err(e) => return Err(e),
        };

        progress.phase("Scanning existing artifacts");
        let processed = store.scan_processed()?;
        let work = delta(&universe, &processed);
        let total = work.len();

        info!(
            units = total,
            languages = self.config.languages.len(),
            concurrency = self.config.concurrency,
            "dispatching work units"
        );

        progress.phase("Fetching documents");
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let base = self
            .config
            .document_base
            .trim_end_matches('/')
            .to_string();

        let mut handles = Vec::with_capacity(total);
        for id in work {
            let sem = semaphore.clone();
            let client = self.client.clone();
            let store = store.clone();
            let languages = self.config.languages.clone();
            let base = base.clone();

            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                let outcome = fetch_unit(&client, &store, &base, &id, &languages).await;
                (id, outcome)
            }));
        }

        let mut result = HarvestResult {
            units: total,
            ..Default::default()
        };
        let mut completed = 0usize;

        for handle in handles {
            completed += 1;
            match handle.await {
                Ok((id, outcome)) => {
                    result.documents_written += outcome.written;
                    result.not_found += outcome.not_found;
                    result.errors += outcome.errors;
                    progress.unit_done(&id, completed, total);
                }
                Err(e) => {
                    warn!(error = %e, "work unit task failed");
                    result.errors += 1;
                }
            }
        }

        result.duration = start.elapsed();

        info!(
            units = result.units,
            written = result.documents_written,
            not_found = result.not_found,
            errors = result.errors,
            duration_ms = result.duration.as_millis(),
            "harvest completed"
        );

        progress.done(&result);
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Work unit
// ---------------------------------------------------------------------------

/// Fetch one identifier in every requested language, in order.
///
/// One language's failure never aborts the remaining languages: a
/// transport or status failure writes an error marker and moves on, the
/// not-found phrase writes nothing, and a storage failure ends only the
/// current attempt.
async fn fetch_unit(
    client: &Client,
    store: &Store,
    document_base: &str,
    id: &CelexId,
    languages: &[String],
) -> UnitOutcome {
    let mut outcome = UnitOutcome::default();

    for lang in languages {
        let lang_up = lang.to_uppercase();
        let url = format!("{document_base}/legal-content/{lang_up}/TXT/HTML/?uri=CELEX:{id}");

        let body = match fetch_body(client, &url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%id, lang = %lang_up, error = %e, "fetch failed, writing error marker");
                outcome.errors += 1;
                if let Err(write_err) = store.write_error_marker(lang, id, &e.to_string()) {
                    warn!(%id, lang = %lang_up, error = %write_err, "failed to write error marker");
                }
                continue;
            }
        };

        if body.contains(NOT_FOUND_PHRASE) {
            info!(%id, lang = %lang_up, "document does not exist in this language");
            outcome.not_found += 1;
            continue;
        }

        let cleaned = lexharvest_text::clean_text(&body);
        let text = extract_text(&cleaned);

        match store.write_document(lang, id, &text) {
            Ok(path) => {
                debug!(%id, lang = %lang_up, ?path, "document written");
                outcome.written += 1;
            }
            Err(e) => {
                warn!(%id, lang = %lang_up, error = %e, "failed to write document");
                outcome.errors += 1;
            }
        }
    }

    outcome
}

/// GET a document rendition, surfacing transport and status failures as
/// [`LexHarvestError::Network`].
async fn fetch_body(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LexHarvestError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LexHarvestError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| LexHarvestError::Network(format!("{url}: body read failed: {e}")))
}
