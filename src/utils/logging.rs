use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    /// Install a fmt subscriber. `RUST_LOG` wins over the default filter.
    /// Safe to call more than once; later calls are ignored.
    pub fn init() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("css_bundle_writer=info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    pub fn no_css_bundle(outdir: &Path) {
        debug!("🎨 No CSS bundle in {}, nothing to post-process", outdir.display());
    }

    pub fn css_bundle_found(path: &Path, has_source_map: bool) {
        if has_source_map {
            info!("🎨 CSS bundle: {} (with source map)", path.display());
        } else {
            info!("🎨 CSS bundle: {}", path.display());
        }
    }

    pub fn duplicates_removed(rules: usize, declarations: usize) {
        if rules > 0 || declarations > 0 {
            info!(
                "🧹 Removed {} duplicate CSS rules, {} duplicate declarations",
                rules, declarations
            );
        } else {
            debug!("🧹 No duplicate CSS rules found");
        }
    }

    pub fn source_map_written(path: &Path) {
        debug!("🗺️  Source map: {}", path.display());
    }

    pub fn source_map_skipped_for_production() {
        debug!("🗺️  Production build, source map not written");
    }

    pub fn copying_asset(path: &Path) {
        debug!("📄 Copying asset: {}", path.display());
    }

    pub fn write_complete(css_path: &Path, asset_count: usize, build_time: std::time::Duration) {
        info!(
            "✅ Wrote {} and {} assets in {:.2?}",
            css_path.display(),
            asset_count,
            build_time
        );
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
