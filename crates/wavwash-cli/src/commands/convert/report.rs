//! Batch conversion report types.

use serde::Serialize;
use wavwash_core::ExtractWarning;

/// Outcome of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    Skipped,
    Failed,
}

/// Result of converting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Input path
    pub input: String,
    /// Output path
    pub output: String,
    pub status: FileStatus,
    /// Stable code of the failure (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Failure message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExtractWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Source bit depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits_per_sample: Option<u16>,
    /// Frames per channel written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<usize>,
    /// BLAKE3 hash of the written PCM payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcm_hash: Option<String>,
}

impl FileReport {
    pub(crate) fn new(input: String, output: String, status: FileStatus) -> Self {
        Self {
            input,
            output,
            status,
            error_code: None,
            error: None,
            warnings: Vec::new(),
            channels: None,
            sample_rate: None,
            bits_per_sample: None,
            frames: None,
            pcm_hash: None,
        }
    }
}

/// Summary of a whole conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<FileReport>,
}

impl BatchReport {
    pub fn from_results(results: Vec<FileReport>) -> Self {
        let count = |status| results.iter().filter(|r| r.status == status).count();
        Self {
            total: results.len(),
            converted: count(FileStatus::Converted),
            skipped: count(FileStatus::Skipped),
            failed: count(FileStatus::Failed),
            results,
        }
    }

    /// True when no file failed.
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}
