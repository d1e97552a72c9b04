use css_bundle_writer::{write_processed_output, BuildContext, BuildMode, OutputFile};
use sourcemap::SourceMapBuilder;
use std::path::{Path, PathBuf};

const BUTTON_SOURCE: &str = ".button { color: red; }\n";
const CARD_SOURCE: &str = ".card { composes: button from './button.module.css'; padding: 4px; }\n";

/// What the bundler emits when card.module.css composes button.module.css:
/// the button rule lands in the bundle twice.
const COMPOSED_BUNDLE: &str = "\
.button_abc { color: red; }
.card_def { padding: 4px; }
.button_abc { color: red; }
";

fn upstream_map() -> String {
    let mut builder = SourceMapBuilder::new(Some("css-bundle-X.css"));
    let button = builder.add_source("src/button.module.css");
    builder.set_source_contents(button, Some(BUTTON_SOURCE));
    let card = builder.add_source("src/card.module.css");
    builder.set_source_contents(card, Some(CARD_SOURCE));

    builder.add_raw(0, 0, 0, 0, Some(button), None, false);
    builder.add_raw(1, 0, 0, 0, Some(card), None, false);
    builder.add_raw(2, 0, 0, 0, Some(button), None, false);

    let mut json = Vec::new();
    builder.into_sourcemap().to_writer(&mut json).unwrap();
    String::from_utf8(json).unwrap()
}

fn bundle_files(outdir: &Path) -> (PathBuf, Vec<OutputFile>, String) {
    let css_path = outdir.join("css-bundle-X.css");
    let map = upstream_map();
    let files = vec![
        OutputFile::new(outdir.join("entry.client-123.js"), "import './x';"),
        OutputFile::new(&css_path, COMPOSED_BUNDLE),
        OutputFile::new(outdir.join("css-bundle-X.css.map"), map.clone()),
    ];
    (css_path, files, map)
}

#[tokio::test]
async fn test_composed_rule_written_once() {
    let temp_dir = tempfile::tempdir().unwrap();
    let outdir = temp_dir.path().join("build");
    let (css_path, files, _) = bundle_files(&outdir);

    let summary = write_processed_output(&BuildContext::new(&outdir), &files)
        .await
        .unwrap()
        .unwrap();

    let css = std::fs::read_to_string(&css_path).unwrap();
    assert_eq!(css.matches(".button_abc").count(), 1, "deduped CSS:\n{}", css);
    assert!(css.contains(".card_def"));
    assert!(!css.contains("sourceMappingURL"));
    assert_eq!(summary.removed_rules, 1);
}

#[tokio::test]
async fn test_development_map_is_regenerated() {
    let temp_dir = tempfile::tempdir().unwrap();
    let outdir = temp_dir.path().join("build");
    let (css_path, files, upstream) = bundle_files(&outdir);
    let context = BuildContext::new(&outdir)
        .with_sourcemap(true)
        .with_mode(BuildMode::Development);

    let summary = write_processed_output(&context, &files)
        .await
        .unwrap()
        .unwrap();

    let map_path = outdir.join("css-bundle-X.css.map");
    assert_eq!(summary.map_path, Some(map_path.clone()));
    assert!(css_path.exists());

    let written = std::fs::read_to_string(&map_path).unwrap();
    assert_ne!(written, upstream, "map must be regenerated, not passed through");

    let decoded = sourcemap::SourceMap::from_slice(written.as_bytes()).unwrap();
    assert!(
        decoded.sources().any(|s| s.ends_with("button.module.css")),
        "chained map should point at the CSS module sources: {}",
        written
    );
}

#[tokio::test]
async fn test_production_map_is_not_written() {
    let temp_dir = tempfile::tempdir().unwrap();
    let outdir = temp_dir.path().join("build");
    let (css_path, files, _) = bundle_files(&outdir);
    let context = BuildContext::new(&outdir)
        .with_sourcemap(true)
        .with_mode(BuildMode::Production);

    let summary = write_processed_output(&context, &files)
        .await
        .unwrap()
        .unwrap();

    assert!(css_path.exists());
    assert!(summary.map_path.is_none());
    assert!(!outdir.join("css-bundle-X.css.map").exists());
}
