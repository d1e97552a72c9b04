use crate::core::{interfaces::FileSystemService, models::*};
use crate::utils::{CssBundleError, Result};
use std::path::Path;
use tokio::fs;

pub struct TokioFileSystemService;

#[async_trait::async_trait]
impl FileSystemService for TokioFileSystemService {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).await.map_err(CssBundleError::Io)
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).await.map_err(CssBundleError::Io)
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await.map_err(CssBundleError::Io)
    }

    async fn collect_output_files(&self, dir: &Path) -> Result<Vec<OutputFile>> {
        let mut files = Vec::new();
        let mut pending = vec![dir.to_path_buf()];

        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(&current).await.map_err(CssBundleError::Io)?;

            while let Some(entry) = entries.next_entry().await.map_err(CssBundleError::Io)? {
                let path = entry.path();
                let file_type = entry.file_type().await.map_err(CssBundleError::Io)?;

                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    let contents = self.read_file(&path).await?;
                    files.push(OutputFile { path, contents });
                }
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}
