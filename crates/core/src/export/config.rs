//! Output location policy for exported files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default directory for exported files
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Default file name prefix
pub const DEFAULT_OUTPUT_PREFIX: &str = "lbm_data";

/// Extension used for both ASCII and binary files
pub const FILE_EXTENSION: &str = "vti";

/// Where a [`GridImageWriter`](crate::export::GridImageWriter) puts its files.
///
/// File names are `<output_prefix>_<step>.vti` with the step zero-padded to
/// seven digits, e.g. `lbm_data_0000042.vti`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Directory receiving the files; must already exist
    pub output_dir: PathBuf,
    /// File name prefix
    pub output_prefix: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }
}

impl WriterConfig {
    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the file name prefix
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// File name for `step`. Steps wider than seven digits are printed in full.
    pub fn file_name(&self, step: u64) -> String {
        format!("{}_{step:07}.{FILE_EXTENSION}", self.output_prefix)
    }

    /// Full destination path for `step`
    pub fn path_for_step(&self, step: u64) -> PathBuf {
        self.output_dir.join(self.file_name(step))
    }
}
