//! File processor implementation with compile-time constants and global logging integration

use crate::config::constants::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_RECORD_COUNT,
};
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions accepted for interchange files (lowercase, without the dot)
pub const KNOWN_EXTENSIONS: &[&str] = &["txt", "edi", "pla"];

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unknown file extension: expected one of .txt/.edi/.pla, found {extension:?}")]
    UnknownExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum record count: {records} (max: {max_records})")]
    TooManyRecords { records: usize, max_records: usize },
}

impl FileProcessorError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::UnknownExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            FileProcessorError::TooManyRecords { .. } => codes::file_processing::TOO_MANY_RECORDS,
        }
    }

    /// Check if this error should halt processing
    pub fn requires_halt(&self) -> bool {
        crate::logging::codes::requires_halt(self.error_code().as_str())
    }

    /// Get error severity
    pub fn severity(&self) -> &'static str {
        crate::logging::codes::get_severity(self.error_code().as_str()).as_str()
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        crate::logging::codes::get_category(self.error_code().as_str())
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        crate::logging::codes::is_recoverable(self.error_code().as_str())
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// File extension, lowercased (if any)
    pub extension: Option<String>,
    /// Number of records (lines) in the file
    pub record_count: usize,
    /// Whether the extension is one of the known interchange extensions
    pub has_known_extension: bool,
    /// File modification time (if available)
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    /// Get file size in human-readable format
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Check if file is likely to be large for processing (uses compile-time threshold)
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// File processing result containing decoded source and metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// File contents decoded from latin-1
    pub source: String,
    /// File metadata
    pub metadata: FileMetadata,
    /// Processing duration
    pub processing_duration: std::time::Duration,
}

impl FileProcessingResult {
    /// Get character count
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }

    /// Check if file is empty content-wise (only whitespace)
    pub fn is_effectively_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// File processor with compile-time bounds and runtime preferences
pub struct FileProcessor {
    /// Whether to reject files whose extension is not a known one
    pub require_known_extension: bool,
    /// Whether to enable detailed performance logging
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    /// Create new file processor with default preferences
    pub fn new() -> Self {
        Self {
            require_known_extension: true,
            enable_performance_logging: true,
        }
    }

    /// Require (or not) a known interchange extension
    pub fn with_known_extension_required(mut self, required: bool) -> Self {
        self.require_known_extension = required;
        self
    }

    /// Enable or disable performance logging
    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    /// Get the compile-time maximum file size
    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Process a file and return contents with metadata
    pub fn process_file(
        &self,
        file_path: &str,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = std::time::Instant::now();

        log_debug!("Starting file processing", "file" => file_path);

        let path = self.validate_path(file_path)?;
        let metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata, file_path)?;
        let source = self.read_latin1(&path, file_path)?;

        let record_count = source.lines().count();
        if record_count > MAX_RECORD_COUNT {
            let error = FileProcessorError::TooManyRecords {
                records: record_count,
                max_records: MAX_RECORD_COUNT,
            };
            log_error!(error.error_code(), "File exceeds maximum record count",
                "file" => file_path,
                "records" => record_count,
                "max_records" => MAX_RECORD_COUNT);
            return Err(error);
        }

        let mut final_metadata = metadata;
        final_metadata.record_count = record_count;

        let processing_duration = start_time.elapsed();

        let result = FileProcessingResult {
            source,
            metadata: final_metadata,
            processing_duration,
        };

        self.log_processing_success(&result, file_path);

        Ok(result)
    }

    /// Log processing success with metrics
    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        if self.enable_performance_logging {
            let duration_ms = result.processing_duration.as_secs_f64() * 1000.0;
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully with performance metrics",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "size_human" => result.metadata.human_readable_size(),
                "records" => result.metadata.record_count,
                "chars" => result.char_count(),
                "duration_ms" => format!("{:.2}", duration_ms),
                "is_large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "records" => result.metadata.record_count
            );
        }
    }

    /// Validate file path and check existence
    fn validate_path(&self, file_path: &str) -> Result<PathBuf, FileProcessorError> {
        if file_path.is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        let path = Path::new(file_path);

        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => file_path);
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path);
            return Err(error);
        }

        match path.canonicalize() {
            Ok(canonical_path) => {
                log_debug!("Path validation successful",
                    "canonical_path" => canonical_path.display());
                Ok(canonical_path)
            }
            Err(e) => {
                let error = FileProcessorError::IoError {
                    message: format!("Failed to resolve path '{}': {}", file_path, e),
                };
                log_error!(error.error_code(), "Failed to canonicalize path",
                    "path" => file_path,
                    "io_error" => e);
                Err(error)
            }
        }
    }

    /// Get file metadata
    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                let error = match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        let err = FileProcessorError::PermissionDenied {
                            path: path.display().to_string(),
                        };
                        log_error!(err.error_code(), "Permission denied accessing file",
                            "path" => path.display());
                        err
                    }
                    _ => {
                        let err = FileProcessorError::IoError {
                            message: format!(
                                "Failed to read metadata for '{}': {}",
                                path.display(),
                                e
                            ),
                        };
                        log_error!(err.error_code(), "Failed to read file metadata",
                            "path" => path.display(),
                            "io_error" => e);
                        err
                    }
                };
                return Err(error);
            }
        };

        let size = metadata.len();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let has_known_extension = extension
            .as_deref()
            .map(|ext| KNOWN_EXTENSIONS.contains(&ext))
            .unwrap_or(false);
        let modified = metadata.modified().ok();

        let file_metadata = FileMetadata {
            path: path.to_path_buf(),
            size,
            extension: extension.clone(),
            record_count: 0, // Will be updated after reading
            has_known_extension,
            modified,
        };

        log_debug!("File metadata collected",
            "size_bytes" => size,
            "size_human" => file_metadata.human_readable_size(),
            "extension" => extension.as_deref().unwrap_or("none"),
            "known_extension" => has_known_extension);

        Ok(file_metadata)
    }

    /// Validate file properties using compile-time constants
    fn validate_file(
        &self,
        metadata: &FileMetadata,
        file_path: &str,
    ) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds maximum size limit",
                "file" => file_path,
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_FILE_SIZE);
            return Err(error);
        }

        if metadata.size == 0 {
            let error = FileProcessorError::EmptyFile;
            log_error!(error.error_code(), "File is empty", "file" => file_path);
            return Err(error);
        }

        if self.require_known_extension && !metadata.has_known_extension {
            let error = FileProcessorError::UnknownExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have a known interchange extension",
                "file" => file_path,
                "extension" => metadata.extension.as_deref().unwrap_or("none"),
                "known" => KNOWN_EXTENSIONS.join("/"));
            return Err(error);
        }

        Ok(())
    }

    /// Read file contents as latin-1
    ///
    /// Each byte maps 1:1 to the Unicode code point with the same value, so
    /// this cannot fail on content, only on I/O.
    fn read_latin1(&self, path: &Path, file_path: &str) -> Result<String, FileProcessorError> {
        match fs::read(path) {
            Ok(bytes) => {
                let content: String = bytes.iter().map(|&b| b as char).collect();

                log_debug!("File content read successfully",
                    "file" => file_path,
                    "bytes" => bytes.len(),
                    "records" => content.lines().count());

                Ok(content)
            }
            Err(e) => {
                let error = match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        let err = FileProcessorError::PermissionDenied {
                            path: path.display().to_string(),
                        };
                        log_error!(err.error_code(), "Permission denied reading file",
                            "file" => file_path);
                        err
                    }
                    _ => {
                        let err = FileProcessorError::IoError {
                            message: format!("Failed to read file '{}': {}", path.display(), e),
                        };
                        log_error!(err.error_code(), "I/O error reading file",
                            "file" => file_path,
                            "io_error" => e);
                        err
                    }
                };
                Err(error)
            }
        }
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// MODULE API FUNCTIONS
// ============================================================================

/// Process a file with default settings
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    let processor = FileProcessor::new();
    processor.process_file(file_path)
}

/// Check whether a path carries one of the known interchange extensions
pub fn has_known_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| KNOWN_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("desadv1.txt");
        let content = "DESADV_D_96A_UN_EAN005\nBGM|REF123|351|9\n";
        fs::write(&file_path, content).unwrap();

        let processor = FileProcessor::new();
        let result = processor.process_file(file_path.to_str().unwrap());

        assert!(result.is_ok());
        let result = result.unwrap();
        assert_eq!(result.metadata.record_count, 2);
        assert!(result.metadata.has_known_extension);
        assert_eq!(result.source, content);
    }

    #[test]
    fn test_latin1_bytes_decode_losslessly() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("accented.edi");
        // 0xE9 is 'é' in latin-1 and invalid as standalone UTF-8
        fs::write(&file_path, b"BGM|CAF\xE9|351|9\n").unwrap();

        let result = FileProcessor::new()
            .process_file(file_path.to_str().unwrap())
            .unwrap();

        assert!(result.source.contains('é'));
    }

    #[test]
    fn test_file_not_found() {
        let processor = FileProcessor::new();
        let result = processor.process_file("nonexistent.txt");

        assert!(result.is_err());
        match result.unwrap_err() {
            FileProcessorError::FileNotFound { .. } => {}
            _ => panic!("Expected FileNotFound error"),
        }
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("shipment.dat");
        fs::write(&file_path, "content").unwrap();

        let processor = FileProcessor::new();
        let result = processor.process_file(file_path.to_str().unwrap());

        assert!(result.is_err());
        match result.unwrap_err() {
            FileProcessorError::UnknownExtension { extension } => {
                assert_eq!(extension.as_deref(), Some("dat"));
            }
            _ => panic!("Expected UnknownExtension error"),
        }
    }

    #[test]
    fn test_extension_case_insensitive() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("DESADV1.PLA");
        fs::write(&file_path, "DESADV_D_96A_UN_EAN005\n").unwrap();

        let result = FileProcessor::new().process_file(file_path.to_str().unwrap());
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.txt");
        fs::write(&file_path, "").unwrap();

        let processor = FileProcessor::new();
        let result = processor.process_file(file_path.to_str().unwrap());

        assert!(result.is_err());
        match result.unwrap_err() {
            FileProcessorError::EmptyFile => {}
            _ => panic!("Expected EmptyFile error"),
        }
    }

    #[test]
    fn test_extension_requirement_can_be_relaxed() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("shipment.dat");
        fs::write(&file_path, "DESADV_D_96A_UN_EAN005\n").unwrap();

        let processor = FileProcessor::new().with_known_extension_required(false);
        let result = processor.process_file(file_path.to_str().unwrap());
        assert!(result.is_ok());
    }

    #[test]
    fn test_has_known_extension() {
        assert!(has_known_extension(Path::new("a/b/desadv.txt")));
        assert!(has_known_extension(Path::new("DESADV.EDI")));
        assert!(has_known_extension(Path::new("x.pla")));
        assert!(!has_known_extension(Path::new("x.dat")));
        assert!(!has_known_extension(Path::new("noext")));
    }

    #[test]
    fn test_error_methods() {
        let error = FileProcessorError::FileNotFound {
            path: "desadv.txt".to_string(),
        };

        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(error.category(), "FileProcessing");
        assert_eq!(error.severity(), "Medium");
        assert!(!error.is_recoverable());
        assert!(error.requires_halt());
    }
}
