//! Batch processing of an inbox directory
//!
//! Scans one directory (non-recursively) for interchange files, decodes each
//! in turn, and reports per-file outcomes. Files are never moved or deleted
//! here; the caller owns inbox cleanup.

use crate::config::constants::compile_time::batch_processing::MAX_FILES_PER_BATCH;
use crate::config::runtime::BatchPreferences;
use crate::file_processor::has_known_extension;
use crate::logging::{self, codes};
use crate::pipeline::{decode_file, DecodeOptions, DecodeOutcome, DecodedDocument, PipelineError};
use crate::{log_debug, log_info, log_success};
use std::path::{Path, PathBuf};

/// Configuration for one batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Inbox directory scanned for candidate files
    pub inbox_path: PathBuf,
    /// Decode options applied to every file
    pub options: DecodeOptions,
    /// Whether to log per-file progress at info level
    pub progress_reporting: bool,
}

impl BatchConfig {
    pub fn new(inbox_path: impl Into<PathBuf>) -> Self {
        Self {
            inbox_path: inbox_path.into(),
            options: DecodeOptions::default(),
            progress_reporting: true,
        }
    }

    /// Build from runtime preferences (environment-driven)
    pub fn from_preferences(preferences: &BatchPreferences) -> Self {
        Self {
            inbox_path: PathBuf::from(&preferences.inbox_path),
            options: DecodeOptions::default(),
            progress_reporting: preferences.progress_reporting,
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }
}

/// Errors that abort a whole batch before any file is decoded
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Inbox directory not found: {path}")]
    InboxNotFound { path: PathBuf },

    #[error("Inbox path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Too many files in inbox: {count} (max {MAX_FILES_PER_BATCH})")]
    TooManyFiles { count: usize },

    #[error("I/O error scanning inbox: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            BatchError::InboxNotFound { .. } => codes::file_processing::INVALID_PATH,
            BatchError::NotADirectory { .. } => codes::file_processing::INVALID_PATH,
            BatchError::TooManyFiles { .. } => codes::file_processing::TOO_MANY_FILES,
            BatchError::Io { .. } => codes::file_processing::IO_ERROR,
        }
    }
}

/// Per-file outcomes of one batch run
#[derive(Debug, Default)]
pub struct BatchResults {
    /// Files that produced a document
    pub decoded: Vec<(PathBuf, DecodedDocument)>,
    /// Files whose leading record is not the DESADV sentinel
    pub not_this_format: Vec<PathBuf>,
    /// Files that failed to decode; the file stays in the inbox
    pub failed: Vec<(PathBuf, PipelineError)>,
    /// Files skipped because their extension is not a known one
    pub skipped: Vec<PathBuf>,
}

impl BatchResults {
    /// Number of files actually decoded into documents
    pub fn decoded_count(&self) -> usize {
        self.decoded.len()
    }

    /// Number of files examined (decoded, not-this-format, or failed)
    pub fn processed_count(&self) -> usize {
        self.decoded.len() + self.not_this_format.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Decode every candidate file in the inbox.
///
/// Candidate files are regular files whose extension is in the known set;
/// everything else is left untouched. Scanning is not recursive. A decode
/// failure is recorded and the batch continues with the next file.
pub fn run_batch(config: &BatchConfig) -> Result<BatchResults, BatchError> {
    let candidates = scan_inbox(&config.inbox_path)?;

    log_info!("Starting batch run",
        "inbox" => config.inbox_path.display(),
        "candidates" => candidates.len());

    let mut results = BatchResults::default();

    for (file_id, path) in candidates.iter().enumerate() {
        if !has_known_extension(path) {
            log_debug!("Skipping file with unknown extension",
                "file" => path.display());
            results.skipped.push(path.clone());
            continue;
        }

        if config.progress_reporting {
            log_info!("Processing file",
                "file" => path.display(),
                "index" => file_id + 1);
        }

        logging::set_file_context(path.clone(), file_id);
        let outcome = decode_file(path, config.options);
        logging::clear_file_context();

        match outcome {
            Ok(DecodeOutcome::Document(decoded)) => {
                results.decoded.push((path.clone(), decoded));
            }
            Ok(DecodeOutcome::NotThisFormat) => {
                log_debug!("File is not a DESADV interchange",
                    "file" => path.display());
                results.not_this_format.push(path.clone());
            }
            Err(error) => {
                results.failed.push((path.clone(), error));
            }
        }
    }

    log_success!(codes::success::BATCH_COMPLETE, "Batch run complete",
        "decoded" => results.decoded.len(),
        "not_this_format" => results.not_this_format.len(),
        "failed" => results.failed.len(),
        "skipped" => results.skipped.len());

    Ok(results)
}

/// List regular files in the inbox, sorted by name for a stable order
fn scan_inbox(inbox: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !inbox.exists() {
        return Err(BatchError::InboxNotFound {
            path: inbox.to_path_buf(),
        });
    }
    if !inbox.is_dir() {
        return Err(BatchError::NotADirectory {
            path: inbox.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    let entries = std::fs::read_dir(inbox).map_err(|source| BatchError::Io { source })?;
    for entry in entries {
        let entry = entry.map_err(|source| BatchError::Io { source })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    if files.len() > MAX_FILES_PER_BATCH {
        return Err(BatchError::TooManyFiles { count: files.len() });
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "DESADV_D_96A_UN_EAN005\n\
                          BGM|REF123|351|9\n\
                          LIN|8412345678905|EN|1\n\
                          QTYLIN|12|10.5|KGM\n";

    #[test]
    fn test_batch_mixed_inbox() {
        let inbox = tempdir().unwrap();
        fs::write(inbox.path().join("a_good.txt"), SAMPLE).unwrap();
        fs::write(inbox.path().join("b_other.edi"), "INVOIC_D_96A\nBGM|X|380|9\n").unwrap();
        fs::write(
            inbox.path().join("c_broken.txt"),
            "DESADV_D_96A_UN_EAN005\nBGM|A|351|9\nBGM|B|351|9\n",
        )
        .unwrap();
        fs::write(inbox.path().join("d_ignored.dat"), "whatever").unwrap();

        let config = BatchConfig::new(inbox.path());
        let results = run_batch(&config).unwrap();

        assert_eq!(results.decoded.len(), 1);
        assert_eq!(results.decoded[0].1.document.number, "REF123");
        assert_eq!(results.not_this_format.len(), 1);
        assert_eq!(results.failed.len(), 1);
        assert_eq!(results.skipped.len(), 1);
        assert_eq!(results.processed_count(), 3);
        assert!(results.has_failures());

        // Nothing is deleted or moved
        assert!(inbox.path().join("a_good.txt").exists());
        assert!(inbox.path().join("c_broken.txt").exists());
    }

    #[test]
    fn test_batch_failure_does_not_stop_later_files() {
        let inbox = tempdir().unwrap();
        fs::write(
            inbox.path().join("1_broken.txt"),
            "DESADV_D_96A_UN_EAN005\nBGM|A|351|9\nUNS|S\n",
        )
        .unwrap();
        fs::write(inbox.path().join("2_good.txt"), SAMPLE).unwrap();

        let results = run_batch(&BatchConfig::new(inbox.path())).unwrap();
        assert_eq!(results.failed.len(), 1);
        assert_eq!(results.decoded.len(), 1);
    }

    #[test]
    fn test_empty_inbox() {
        let inbox = tempdir().unwrap();
        let results = run_batch(&BatchConfig::new(inbox.path())).unwrap();
        assert_eq!(results.processed_count(), 0);
    }

    #[test]
    fn test_inbox_not_found() {
        let err = run_batch(&BatchConfig::new("/nonexistent/inbox")).unwrap_err();
        assert_matches!(err, BatchError::InboxNotFound { .. });
        assert_eq!(err.error_code().as_str(), "E011");
    }

    #[test]
    fn test_subdirectories_ignored() {
        let inbox = tempdir().unwrap();
        fs::create_dir(inbox.path().join("nested")).unwrap();
        fs::write(inbox.path().join("nested").join("deep.txt"), SAMPLE).unwrap();
        fs::write(inbox.path().join("top.txt"), SAMPLE).unwrap();

        let results = run_batch(&BatchConfig::new(inbox.path())).unwrap();
        // Only the top-level file is seen
        assert_eq!(results.decoded.len(), 1);
    }
}
