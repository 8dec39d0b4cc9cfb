//! Application configuration for LexHarvest.
//!
//! User config lives at `~/.lexharvest/lexharvest.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LexHarvestError, Result};
use crate::langs;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "lexharvest.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".lexharvest";

/// The fixed bulk query against the EUR-Lex SPARQL endpoint: all resources
/// typed regulation, directive, or decision, keyed by their CELEX identifier.
pub const DEFAULT_SPARQL_URL: &str = "http://publications.europa.eu/webapi/rdf/sparql?default-graph-uri=&query=prefix+cdm%3A+%3Chttp%3A%2F%2Fpublications.europa.eu%2Fontology%2Fcdm%23%3E%0D%0A%0D%0Aselect+%3Fcelex_id%0D%0Awhere+%7B%0D%0A%3Feu_act+cdm%3Aresource_legal_id_celex+%3Fcelex_id.%0D%0A%3Feu_act+a+%3Feu_act_type.%0D%0A%3Feu_act+cdm%3Aresource_legal_number_natural+%3Feu_act_number.%0D%0AFILTER%28%3Feu_act_type+IN+%28cdm%3Aregulation%2C+cdm%3Adirective%2C+cdm%3Adecision%29%29%0D%0A%7D&format=text%2Fhtml&timeout=0&debug=on&run=+Run+Query+";

/// Default base URL for the document rendition endpoint.
pub const DEFAULT_DOCUMENT_BASE: &str = "https://eur-lex.europa.eu";

// ---------------------------------------------------------------------------
// Config structs (matching lexharvest.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Remote endpoint overrides.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Storage root for harvested documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Concurrent work units (defaults to hardware parallelism).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Language codes to harvest (defaults to all 24 official languages).
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
            languages: default_languages(),
        }
    }
}

fn default_output_dir() -> String {
    "~/lexharvest-data".into()
}
fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_languages() -> Vec<String> {
    langs::all_codes().iter().map(|c| c.to_string()).collect()
}

/// `[endpoints]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Full URL of the bulk identifier query.
    #[serde(default = "default_sparql_url")]
    pub sparql_url: String,

    /// Base URL of the document rendition service.
    #[serde(default = "default_document_base")]
    pub document_base: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            sparql_url: default_sparql_url(),
            document_base: default_document_base(),
        }
    }
}

fn default_sparql_url() -> String {
    DEFAULT_SPARQL_URL.into()
}
fn default_document_base() -> String {
    DEFAULT_DOCUMENT_BASE.into()
}

// ---------------------------------------------------------------------------
// Harvest config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime harvest configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Storage root for harvested documents.
    pub root: PathBuf,
    /// Lowercase two-letter language codes, in request order.
    pub languages: Vec<String>,
    /// Maximum concurrent work units.
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Full URL of the bulk identifier query.
    pub sparql_url: String,
    /// Base URL of the document rendition service.
    pub document_base: String,
}

impl From<&AppConfig> for HarvestConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            root: expand_tilde(&config.defaults.output_dir),
            languages: config.defaults.languages.clone(),
            concurrency: config.defaults.concurrency.max(1),
            timeout_secs: config.defaults.timeout_secs,
            sparql_url: config.endpoints.sparql_url.clone(),
            document_base: config.endpoints.document_base.clone(),
        }
    }
}

impl HarvestConfig {
    /// Check that every requested language code is in the registry,
    /// normalizing to lowercase.
    pub fn validate_languages(&mut self) -> Result<()> {
        for code in &mut self.languages {
            if !langs::is_valid_code(code) {
                return Err(LexHarvestError::config(format!(
                    "unknown language code: {code}"
                )));
            }
            *code = code.to_lowercase();
        }
        if self.languages.is_empty() {
            return Err(LexHarvestError::config("no languages requested"));
        }
        Ok(())
    }
}

/// Expand a leading `~/` against the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.lexharvest/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LexHarvestError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.lexharvest/lexharvest.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LexHarvestError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LexHarvestError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LexHarvestError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LexHarvestError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LexHarvestError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("sparql_url"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.timeout_secs, 30);
        assert_eq!(parsed.defaults.languages.len(), 24);
        assert_eq!(parsed.endpoints.document_base, DEFAULT_DOCUMENT_BASE);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
output_dir = "/srv/eurlex"
languages = ["en", "de"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.output_dir, "/srv/eurlex");
        assert_eq!(config.defaults.languages, vec!["en", "de"]);
        assert_eq!(config.defaults.timeout_secs, 30);
    }

    #[test]
    fn harvest_config_from_app_config() {
        let app = AppConfig::default();
        let harvest = HarvestConfig::from(&app);
        assert!(harvest.concurrency >= 1);
        assert_eq!(harvest.languages.len(), 24);
        assert_eq!(harvest.sparql_url, DEFAULT_SPARQL_URL);
    }

    #[test]
    fn language_validation_rejects_unknown_codes() {
        let mut harvest = HarvestConfig::from(&AppConfig::default());
        harvest.languages = vec!["EN".into(), "xx".into()];
        assert!(harvest.validate_languages().is_err());

        harvest.languages = vec!["EN".into(), "de".into()];
        harvest.validate_languages().expect("valid codes");
        assert_eq!(harvest.languages, vec!["en", "de"]);
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/srv/data"), PathBuf::from("/srv/data"));
    }
}
