use crate::core::models::*;
use crate::utils::Result;
use async_trait::async_trait;
use std::path::Path;

/// File system operations interface
#[async_trait]
pub trait FileSystemService: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Create or truncate `path`. The parent directory must already exist.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;
    /// Every file under `dir`, recursively, sorted by path
    async fn collect_output_files(&self, dir: &Path) -> Result<Vec<OutputFile>>;
}

/// Duplicate-rule removal over a whole stylesheet
pub trait CssDeduplicator: Send + Sync {
    fn dedupe(&self, css: &str, options: &DedupeOptions<'_>) -> Result<DedupeOutput>;
}
