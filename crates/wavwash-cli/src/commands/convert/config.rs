//! Configuration for the convert command.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Batch conversion settings, loadable from a JSON file.
///
/// Missing fields take their defaults; command-line flags are applied on
/// top with [`ConvertConfig::apply_args`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Extension given to converted files (default: "pcm.wav")
    pub output_extension: String,
    /// Replace outputs that already exist (default: false)
    pub overwrite: bool,
    /// Descend into subdirectories (default: true)
    pub recursive: bool,
    /// Worker threads; 0 means one per file (default: 0)
    pub jobs: usize,
    /// Output root mirroring the input tree (default: next to inputs)
    pub out_dir: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            output_extension: "pcm.wav".to_string(),
            overwrite: false,
            recursive: true,
            jobs: 0,
            out_dir: None,
        }
    }
}

impl ConvertConfig {
    /// Parse a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.check()?;
        Ok(config)
    }

    /// Overrides file values with whatever was given on the command line.
    pub fn apply_args(&mut self, args: &super::ConvertArgs) {
        if let Some(out_dir) = &args.out_dir {
            self.out_dir = Some(out_dir.clone());
        }
        if let Some(jobs) = args.jobs {
            self.jobs = jobs;
        }
        if args.overwrite {
            self.overwrite = true;
        }
        if args.no_recursive {
            self.recursive = false;
        }
    }

    fn check(&self) -> Result<()> {
        let ext = self.output_extension.trim_start_matches('.');
        if ext.is_empty() || ext.contains(|c| c == '/' || c == '\\') {
            anyhow::bail!("invalid output_extension: {:?}", self.output_extension);
        }
        if ext.eq_ignore_ascii_case("wav") {
            anyhow::bail!("output_extension \"wav\" would overwrite the inputs");
        }
        Ok(())
    }

    /// The extension without a leading dot.
    pub(crate) fn extension(&self) -> &str {
        self.output_extension.trim_start_matches('.')
    }
}
