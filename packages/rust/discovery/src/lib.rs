//! CELEX identifier discovery against the EUR-Lex SPARQL endpoint.
//!
//! A single bulk query returns every resource typed as regulation,
//! directive, or decision, keyed by its CELEX identifier. The result is
//! the "universe" the harvest engine diffs against on-disk state.
//!
//! Discovery failure is never fatal to the process: the engine maps a
//! [`LexHarvestError::Discovery`] to an empty run.

mod parser;

use std::collections::BTreeSet;
use std::time::Duration;

use lexharvest_shared::{CelexId, LexHarvestError, Result};
use reqwest::Client;
use tracing::{debug, info, instrument};

/// Maximum number of redirects to follow when querying the endpoint.
const MAX_REDIRECTS: usize = 3;

/// Default timeout in seconds for the bulk query.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// User-Agent string for discovery requests.
const USER_AGENT: &str = concat!("LexHarvest/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Discovery options
// ---------------------------------------------------------------------------

/// Configuration for the discovery query.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Full URL of the bulk identifier query.
    pub sparql_url: String,
    /// Timeout for the query in seconds. The full result set is large,
    /// so this is much longer than the per-document timeout.
    pub timeout_secs: u64,
}

impl DiscoveryOptions {
    pub fn new(sparql_url: impl Into<String>) -> Self {
        Self {
            sparql_url: sparql_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch and parse the universe of known CELEX identifiers.
///
/// Returns [`LexHarvestError::Discovery`] if the endpoint is unreachable,
/// answers with a non-success status, or the response contains no
/// parsable result rows.
#[instrument(skip_all, fields(url = %opts.sparql_url))]
pub async fn discover(opts: &DiscoveryOptions) -> Result<BTreeSet<CelexId>> {
    let client = build_client(opts)?;

    debug!("issuing bulk identifier query");

    let response = client
        .get(&opts.sparql_url)
        .send()
        .await
        .map_err(|e| LexHarvestError::Discovery(format!("endpoint not responsive: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LexHarvestError::Discovery(format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| LexHarvestError::Discovery(format!("failed to read response: {e}")))?;

    let ids = parser::parse_result_rows(&body);
    if ids.is_empty() {
        return Err(LexHarvestError::Discovery(
            "response contained no result rows".into(),
        ));
    }

    info!(count = ids.len(), "identifier universe discovered");
    Ok(ids)
}

/// Build a reqwest client with appropriate settings.
fn build_client(opts: &DiscoveryOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| LexHarvestError::Discovery(format!("failed to build HTTP client: {e}")))
}
