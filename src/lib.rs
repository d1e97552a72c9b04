// CSS bundle post-processing for bundler output
// Classify the emitted files, dedupe the CSS bundle, write everything back

pub mod core;
pub mod infrastructure;
pub mod utils;

pub use crate::core::{
    group_files, is_bundle_file, write_processed_output, BuildContext, BuildMode,
    BundleFileKind, BundleNaming, CssBundleWriter, GroupedFiles, OutputFile, WriteSummary,
};
pub use crate::utils::{CssBundleError, Result};
