use crate::utils::{CssBundleError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A file emitted by the upstream bundler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// UTF-8 view of the contents
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.contents).map_err(|_| CssBundleError::InvalidEncoding {
            path: self.path.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    #[default]
    Production,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        self == BuildMode::Production
    }
}

impl FromStr for BuildMode {
    type Err = CssBundleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(BuildMode::Development),
            "production" => Ok(BuildMode::Production),
            other => Err(CssBundleError::config(format!(
                "Unknown build mode '{}', expected 'development' or 'production'",
                other
            ))),
        }
    }
}

/// Build settings the write step reads from the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildContext {
    pub assets_build_directory: PathBuf,
    #[serde(default)]
    pub sourcemap: bool,
    #[serde(default)]
    pub mode: BuildMode,
}

impl BuildContext {
    pub fn new(assets_build_directory: impl Into<PathBuf>) -> Self {
        Self {
            assets_build_directory: assets_build_directory.into(),
            sourcemap: false,
            mode: BuildMode::default(),
        }
    }

    pub fn with_sourcemap(mut self, sourcemap: bool) -> Self {
        self.sourcemap = sourcemap;
        self
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Which bundle artifact a classifier check is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFileKind {
    Css,
    CssMap,
}

impl BundleFileKind {
    pub fn suffix(self) -> &'static str {
        match self {
            BundleFileKind::Css => ".css",
            BundleFileKind::CssMap => ".css.map",
        }
    }
}

/// Naming contract shared with the bundler that emits the CSS bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleNaming {
    prefix: String,
}

impl BundleNaming {
    pub const DEFAULT_PREFIX: &'static str = "css-bundle";

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Pure path check, the file contents are never inspected
    pub fn matches(&self, output_dir: &Path, path: &Path, kind: BundleFileKind) -> bool {
        if path.parent() != Some(output_dir) {
            return false;
        }

        let starts_with_prefix = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with(self.prefix.as_str()))
            .unwrap_or(false);

        starts_with_prefix && path.to_string_lossy().ends_with(kind.suffix())
    }
}

impl Default for BundleNaming {
    fn default() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }
}

/// Output files bucketed by role. Borrowed from the input list.
#[derive(Debug, Default)]
pub struct GroupedFiles<'a> {
    pub css_file: Option<&'a OutputFile>,
    pub source_map_file: Option<&'a OutputFile>,
    pub other_assets: Vec<&'a OutputFile>,
}

impl GroupedFiles<'_> {
    pub fn len(&self) -> usize {
        self.css_file.is_some() as usize
            + self.source_map_file.is_some() as usize
            + self.other_assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Options for one dedupe run
#[derive(Debug, Clone, Default)]
pub struct DedupeOptions<'a> {
    /// Identity of the stylesheet, used as both source and destination
    pub filename: PathBuf,
    /// `None` disables map generation entirely
    pub source_map: Option<SourceMapOptions<'a>>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceMapOptions<'a> {
    /// Map emitted upstream for the same bundle, chained into the new one
    pub previous: Option<&'a str>,
    pub sources_content: bool,
}

#[derive(Debug, Clone)]
pub struct DedupeOutput {
    pub code: String,
    /// Serialized v3 source map, never inlined into `code`
    pub map: Option<String>,
    pub removed_rules: usize,
    pub removed_declarations: usize,
}

/// What a write pass produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub css_path: PathBuf,
    pub map_path: Option<PathBuf>,
    pub copied_assets: Vec<PathBuf>,
    pub removed_rules: usize,
    pub removed_declarations: usize,
}
