use crate::core::classifier::{group_files_with, is_pass_through_asset};
use crate::core::{interfaces::*, models::*};
use crate::infrastructure::{LightningCssDeduplicator, TokioFileSystemService};
use crate::utils::{Logger, Result, Timer};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Post-processes one build's output: dedupes the CSS bundle, writes it with
/// its regenerated map, and copies the remaining emitted assets.
pub struct CssBundleWriter {
    fs_service: Arc<dyn FileSystemService>,
    deduplicator: Arc<dyn CssDeduplicator>,
    naming: BundleNaming,
}

impl CssBundleWriter {
    pub fn new(
        fs_service: Arc<dyn FileSystemService>,
        deduplicator: Arc<dyn CssDeduplicator>,
    ) -> Self {
        Self {
            fs_service,
            deduplicator,
            naming: BundleNaming::default(),
        }
    }

    pub fn with_naming(mut self, naming: BundleNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Returns `Ok(None)` without touching the filesystem when the output
    /// contains no CSS bundle.
    pub async fn write_processed_output(
        &self,
        context: &BuildContext,
        files: &[OutputFile],
    ) -> Result<Option<WriteSummary>> {
        let timer = Timer::start("Writing processed output");
        let grouped = group_files_with(&self.naming, &context.assets_build_directory, files);

        let Some(css_file) = grouped.css_file else {
            Logger::no_css_bundle(&context.assets_build_directory);
            return Ok(None);
        };
        Logger::css_bundle_found(&css_file.path, grouped.source_map_file.is_some());

        let previous_map = match grouped.source_map_file {
            Some(map_file) if context.sourcemap => Some(map_file.text()?),
            _ => None,
        };
        let options = DedupeOptions {
            filename: css_file.path.clone(),
            source_map: context.sourcemap.then(|| SourceMapOptions {
                previous: previous_map,
                sources_content: true,
            }),
        };
        let output = self.deduplicator.dedupe(css_file.text()?, &options)?;
        Logger::duplicates_removed(output.removed_rules, output.removed_declarations);

        if let Some(css_dir) = css_file.path.parent() {
            self.fs_service.create_directory(css_dir).await?;
        }

        let mut writes: Vec<BoxFuture<'_, Result<()>>> = Vec::new();
        writes.push(
            self.fs_service
                .write_file(&css_file.path, output.code.as_bytes()),
        );

        let map_path = match &output.map {
            Some(_) if context.mode.is_production() => {
                Logger::source_map_skipped_for_production();
                None
            }
            Some(map) => {
                let map_path = source_map_path(&css_file.path);
                writes.push(self.write_source_map(map_path.clone(), map));
                Some(map_path)
            }
            None => None,
        };

        let assets: Vec<&OutputFile> = grouped
            .other_assets
            .iter()
            .copied()
            .filter(|file| is_pass_through_asset(file))
            .collect();
        for asset in &assets {
            writes.push(self.copy_asset(asset));
        }

        try_join_all(writes).await?;

        Logger::write_complete(&css_file.path, assets.len(), timer.elapsed());

        Ok(Some(WriteSummary {
            css_path: css_file.path.clone(),
            map_path,
            copied_assets: assets.iter().map(|asset| asset.path.clone()).collect(),
            removed_rules: output.removed_rules,
            removed_declarations: output.removed_declarations,
        }))
    }

    fn write_source_map<'a>(&'a self, path: PathBuf, map: &'a str) -> BoxFuture<'a, Result<()>> {
        async move {
            self.fs_service.write_file(&path, map.as_bytes()).await?;
            Logger::source_map_written(&path);
            Ok(())
        }
        .boxed()
    }

    fn copy_asset<'a>(&'a self, asset: &'a OutputFile) -> BoxFuture<'a, Result<()>> {
        async move {
            Logger::copying_asset(&asset.path);
            if let Some(dir) = asset.path.parent() {
                self.fs_service.create_directory(dir).await?;
            }
            self.fs_service.write_file(&asset.path, &asset.contents).await
        }
        .boxed()
    }
}

impl Default for CssBundleWriter {
    fn default() -> Self {
        Self::new(
            Arc::new(TokioFileSystemService),
            Arc::new(LightningCssDeduplicator::new()),
        )
    }
}

/// `<bundle>.css` → `<bundle>.css.map`
pub fn source_map_path(css_path: &Path) -> PathBuf {
    let mut path: OsString = css_path.as_os_str().to_owned();
    path.push(".map");
    PathBuf::from(path)
}

/// Post-process `files` with the tokio filesystem and lightningcss
pub async fn write_processed_output(
    context: &BuildContext,
    files: &[OutputFile],
) -> Result<Option<WriteSummary>> {
    CssBundleWriter::default()
        .write_processed_output(context, files)
        .await
}
