//! Filesystem storage layer for harvested documents.
//!
//! The [`Store`] wraps the storage root and owns the on-disk layout:
//! `<root>/<LANG>/<celex_id>.txt`, one file per attempted
//! (language, identifier) pair. A file holds either extracted document
//! text or an error marker whose first line starts with [`ERROR_SENTINEL`].
//!
//! The filesystem is the only index: [`Store::scan_processed`] rebuilds
//! the processed set from the tree on every run, deleting error markers
//! so their identifiers are retried.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use lexharvest_shared::{CelexId, LexHarvestError, Result};
use tracing::{debug, info, warn};

/// Prefix marking an artifact as a failed fetch, eligible for retry.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Artifact file extension.
const ARTIFACT_EXT: &str = "txt";

/// Extension of in-flight files before they are renamed into place.
const TEMP_EXT: &str = "tmp";

/// Whether file content denotes an error marker rather than document text.
pub fn is_error_marker(content: &str) -> bool {
    content.trim_start().starts_with(ERROR_SENTINEL)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Handle to the per-language document tree under one storage root.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Create a store handle for `root`. No filesystem access happens
    /// until [`Store::ensure_root`] or a write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root (and parents) if absent. Idempotent.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| LexHarvestError::io(&self.root, e))
    }

    /// Resolve the directory for a language code, creating it lazily.
    ///
    /// Directory names are the upper-cased two-letter codes. Fails with
    /// `Io` if the path exists as a non-directory or cannot be created.
    pub fn lang_dir(&self, code: &str) -> Result<PathBuf> {
        let dir = self.root.join(code.to_uppercase());
        fs::create_dir_all(&dir).map_err(|e| LexHarvestError::io(&dir, e))?;
        Ok(dir)
    }

    /// Path of the artifact for one (language, identifier) pair.
    /// Pure computation; the parent directory may not exist yet.
    pub fn document_path(&self, code: &str, id: &CelexId) -> PathBuf {
        self.root
            .join(code.to_uppercase())
            .join(format!("{id}.{ARTIFACT_EXT}"))
    }

    /// Write extracted document text for `(code, id)` as a full overwrite.
    ///
    /// The write goes to a temp sibling and is renamed into place, so a
    /// reader observes either the whole prior file or the whole new one.
    pub fn write_document(&self, code: &str, id: &CelexId, text: &str) -> Result<PathBuf> {
        self.lang_dir(code)?;
        let path = self.document_path(code, id);
        atomic_write(&path, text)?;
        Ok(path)
    }

    /// Write an error marker for `(code, id)` so the identifier is
    /// retried on the next run.
    pub fn write_error_marker(&self, code: &str, id: &CelexId, reason: &str) -> Result<PathBuf> {
        self.lang_dir(code)?;
        let path = self.document_path(code, id);
        atomic_write(&path, &format!("{ERROR_SENTINEL} {reason}\n"))?;
        Ok(path)
    }

    /// Scan the whole tree and return the set of processed identifiers.
    ///
    /// Walks every language subdirectory. Files whose content starts with
    /// the error sentinel are deleted (their identifiers re-enter the
    /// delta); stray temp files from an interrupted run are removed too.
    /// Everything else contributes its filename stem as a processed id.
    ///
    /// The set is keyed by identifier alone, not (identifier, language):
    /// an id with a successful artifact in any language is considered
    /// processed and is not scheduled again.
    pub fn scan_processed(&self) -> Result<BTreeSet<CelexId>> {
        let mut ids = BTreeSet::new();

        if !self.root.exists() {
            return Ok(ids);
        }

        for entry in fs::read_dir(&self.root).map_err(|e| LexHarvestError::io(&self.root, e))? {
            let entry = entry.map_err(|e| LexHarvestError::io(&self.root, e))?;
            let lang_dir = entry.path();
            if !lang_dir.is_dir() {
                continue;
            }

            for file in fs::read_dir(&lang_dir).map_err(|e| LexHarvestError::io(&lang_dir, e))? {
                let file = file.map_err(|e| LexHarvestError::io(&lang_dir, e))?;
                let path = file.path();

                match path.extension().and_then(|e| e.to_str()) {
                    Some(ARTIFACT_EXT) => {}
                    Some(TEMP_EXT) => {
                        debug!(?path, "removing stray temp file");
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    _ => continue,
                }

                let content =
                    fs::read_to_string(&path).map_err(|e| LexHarvestError::io(&path, e))?;
                if is_error_marker(&content) {
                    debug!(?path, "pruning error marker for retry");
                    fs::remove_file(&path).map_err(|e| LexHarvestError::io(&path, e))?;
                    continue;
                }

                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.insert(CelexId::new(stem));
                } else {
                    warn!(?path, "artifact with undecodable name, skipping");
                }
            }
        }

        info!(count = ids.len(), root = ?self.root, "processed identifiers on disk");
        Ok(ids)
    }
}

/// Per-language artifact counts from a read-only walk of the tree.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// `(LANG, document count)` per language directory, sorted by name.
    pub documents_per_lang: Vec<(String, usize)>,
    /// Error markers currently on disk (pending retry).
    pub pending_retries: usize,
    /// Distinct processed identifiers across all languages.
    pub processed_ids: usize,
}

impl Store {
    /// Count artifacts per language without mutating anything.
    ///
    /// Unlike [`Store::scan_processed`] this never deletes markers, so
    /// it is safe for reporting while no run is in flight.
    pub fn stats(&self) -> Result<StoreStats> {
        let mut stats = StoreStats::default();
        let mut ids = BTreeSet::new();

        if !self.root.exists() {
            return Ok(stats);
        }

        for entry in fs::read_dir(&self.root).map_err(|e| LexHarvestError::io(&self.root, e))? {
            let entry = entry.map_err(|e| LexHarvestError::io(&self.root, e))?;
            let lang_dir = entry.path();
            if !lang_dir.is_dir() {
                continue;
            }
            let lang = entry.file_name().to_string_lossy().to_string();

            let mut documents = 0usize;
            for file in fs::read_dir(&lang_dir).map_err(|e| LexHarvestError::io(&lang_dir, e))? {
                let file = file.map_err(|e| LexHarvestError::io(&lang_dir, e))?;
                let path = file.path();
                if path.extension().and_then(|e| e.to_str()) != Some(ARTIFACT_EXT) {
                    continue;
                }

                let content =
                    fs::read_to_string(&path).map_err(|e| LexHarvestError::io(&path, e))?;
                if is_error_marker(&content) {
                    stats.pending_retries += 1;
                    continue;
                }

                documents += 1;
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.insert(CelexId::new(stem));
                }
            }
            stats.documents_per_lang.push((lang, documents));
        }

        stats.documents_per_lang.sort();
        stats.processed_ids = ids.len();
        Ok(stats)
    }
}

/// Write `content` to `path` via a temp sibling + rename.
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension(TEMP_EXT);
    fs::write(&tmp, content).map_err(|e| LexHarvestError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| LexHarvestError::io(path, e))
}

// ---------------------------------------------------------------------------
// Delta
// ---------------------------------------------------------------------------

/// Identifiers in `universe` with no successful artifact on disk — the
/// actual work for a run. Logs sizes before and after the difference.
pub fn delta(universe: &BTreeSet<CelexId>, processed: &BTreeSet<CelexId>) -> BTreeSet<CelexId> {
    let work: BTreeSet<CelexId> = universe.difference(processed).cloned().collect();
    info!(
        universe = universe.len(),
        processed = processed.len(),
        remaining = work.len(),
        "computed work delta"
    );
    work
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Store::new(dir.path());
        (dir, store)
    }

    #[test]
    fn lang_dir_created_lazily_and_idempotent() {
        let (_dir, store) = test_store();
        let en = store.lang_dir("en").unwrap();
        assert!(en.is_dir());
        assert!(en.ends_with("EN"));
        // Second resolution is a no-op
        assert_eq!(store.lang_dir("en").unwrap(), en);
    }

    #[test]
    fn lang_dir_fails_on_non_directory() {
        let (_dir, store) = test_store();
        store.ensure_root().unwrap();
        fs::write(store.root().join("EN"), "not a dir").unwrap();
        assert!(store.lang_dir("en").is_err());
    }

    #[test]
    fn document_paths_are_disjoint_per_id_and_lang() {
        let (_dir, store) = test_store();
        let a = store.document_path("en", &CelexId::new("32023R0001"));
        let b = store.document_path("en", &CelexId::new("32023R0002"));
        let c = store.document_path("de", &CelexId::new("32023R0001"));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a.ends_with("EN/32023R0001.txt"));
    }

    #[test]
    fn write_document_full_overwrite() {
        let (_dir, store) = test_store();
        let id = CelexId::new("32023R0001");

        let path = store.write_document("en", &id, "first version\n").unwrap();
        store.write_document("en", &id, "second version\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second version\n");
        // No temp sibling left behind
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn error_marker_detected() {
        let (_dir, store) = test_store();
        let id = CelexId::new("32023R0001");
        let path = store.write_error_marker("en", &id, "HTTP 500").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(is_error_marker(&content));
        assert!(content.starts_with("ERROR HTTP 500"));
    }

    #[test]
    fn document_text_is_not_a_marker() {
        assert!(!is_error_marker("Article 1\nScope\n"));
        assert!(is_error_marker("ERROR timeout"));
    }

    #[test]
    fn scan_collects_ids_and_prunes_markers() {
        let (_dir, store) = test_store();
        let good = CelexId::new("32023R0001");
        let bad = CelexId::new("32023R0002");

        store.write_document("en", &good, "Article 1\n").unwrap();
        let marker_path = store.write_error_marker("de", &bad, "HTTP 500").unwrap();

        let processed = store.scan_processed().unwrap();
        assert!(processed.contains(&good));
        assert!(!processed.contains(&bad));
        // Marker deleted so the id is retried next run
        assert!(!marker_path.exists());
    }

    #[test]
    fn scan_spans_all_language_dirs() {
        let (_dir, store) = test_store();
        store
            .write_document("en", &CelexId::new("32023R0001"), "en text\n")
            .unwrap();
        store
            .write_document("fr", &CelexId::new("32019L0790"), "fr text\n")
            .unwrap();

        let processed = store.scan_processed().unwrap();
        assert_eq!(processed.len(), 2);
    }

    #[test]
    fn scan_of_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("never-created"));
        assert!(store.scan_processed().unwrap().is_empty());
    }

    #[test]
    fn scan_removes_stray_temp_files() {
        let (_dir, store) = test_store();
        let en = store.lang_dir("en").unwrap();
        let stray = en.join("32023R0001.tmp");
        fs::write(&stray, "half-written").unwrap();

        let processed = store.scan_processed().unwrap();
        assert!(processed.is_empty());
        assert!(!stray.exists());
    }

    #[test]
    fn stats_count_without_pruning() {
        let (_dir, store) = test_store();
        let id_a = CelexId::new("32023R0001");
        let id_b = CelexId::new("32023R0002");

        store.write_document("en", &id_a, "en text\n").unwrap();
        store.write_document("de", &id_a, "de text\n").unwrap();
        let marker = store.write_error_marker("en", &id_b, "HTTP 500").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(
            stats.documents_per_lang,
            vec![("DE".to_string(), 1), ("EN".to_string(), 1)]
        );
        assert_eq!(stats.pending_retries, 1);
        assert_eq!(stats.processed_ids, 1);
        // Stats must not prune the marker
        assert!(marker.exists());
    }

    #[test]
    fn delta_is_set_difference() {
        let universe: BTreeSet<CelexId> = ["32023R0001", "32023R0002", "32023R0003"]
            .into_iter()
            .map(CelexId::from)
            .collect();
        let processed: BTreeSet<CelexId> =
            ["32023R0002"].into_iter().map(CelexId::from).collect();

        let work = delta(&universe, &processed);
        assert_eq!(work.len(), 2);
        assert!(!work.contains(&CelexId::new("32023R0002")));
    }
}
