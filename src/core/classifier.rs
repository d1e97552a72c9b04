use crate::core::models::{BundleFileKind, BundleNaming, GroupedFiles, OutputFile};
use crate::utils::Logger;
use std::path::Path;

/// Extensions the write step never copies: scripts and maps are written by
/// the bundler itself, the stylesheet is written after dedupe.
const HANDLED_EXTENSIONS: [&str; 3] = [".css", ".js", ".map"];

/// Check a file against the default `css-bundle` naming
pub fn is_bundle_file(output_dir: &Path, file: &OutputFile, kind: BundleFileKind) -> bool {
    BundleNaming::default().matches(output_dir, &file.path, kind)
}

/// Bucket files using the default `css-bundle` naming
pub fn group_files<'a>(output_dir: &Path, files: &'a [OutputFile]) -> GroupedFiles<'a> {
    group_files_with(&BundleNaming::default(), output_dir, files)
}

/// Bucket every file into exactly one of css bundle, source map or other
/// assets. Asset order follows the input.
///
/// Should a second file match a bundle name, the first one stays the bundle
/// (it is the one the writer dedupes) and the later one goes to
/// `other_assets`, so no input file is dropped.
pub fn group_files_with<'a>(
    naming: &BundleNaming,
    output_dir: &Path,
    files: &'a [OutputFile],
) -> GroupedFiles<'a> {
    let mut grouped = GroupedFiles::default();

    for file in files {
        if naming.matches(output_dir, &file.path, BundleFileKind::Css) {
            if grouped.css_file.is_none() {
                grouped.css_file = Some(file);
                continue;
            }
            Logger::warn(&format!(
                "Multiple CSS bundles in output, treating {} as a plain asset",
                file.path.display()
            ));
        } else if naming.matches(output_dir, &file.path, BundleFileKind::CssMap) {
            if grouped.source_map_file.is_none() {
                grouped.source_map_file = Some(file);
                continue;
            }
            Logger::warn(&format!(
                "Multiple CSS bundle maps in output, treating {} as a plain asset",
                file.path.display()
            ));
        }

        grouped.other_assets.push(file);
    }

    grouped
}

/// Images, fonts and anything else that is not a stylesheet, script or map
pub fn is_pass_through_asset(file: &OutputFile) -> bool {
    let path = file.path.to_string_lossy();
    !HANDLED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
