use css_bundle_writer::core::interfaces::FileSystemService;
use css_bundle_writer::infrastructure::TokioFileSystemService;
use css_bundle_writer::utils::Logger;
use css_bundle_writer::{write_processed_output, BuildContext, BuildMode, OutputFile};
use std::path::Path;

fn build_dir(root: &Path) -> std::path::PathBuf {
    root.join("public").join("build")
}

#[tokio::test]
async fn test_assets_copied_and_scripts_untouched() {
    Logger::init();
    let temp_dir = tempfile::tempdir().unwrap();
    let outdir = build_dir(temp_dir.path());
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

    let files = vec![
        OutputFile::new(outdir.join("app.js"), "console.log('app');"),
        OutputFile::new(outdir.join("css-bundle-X.css"), ".a { color: red; }\n"),
        OutputFile::new(outdir.join("_assets").join("logo.png"), png.clone()),
    ];
    let context = BuildContext::new(&outdir).with_mode(BuildMode::Development);

    let summary = write_processed_output(&context, &files)
        .await
        .expect("write step should succeed")
        .expect("bundle present");

    assert_eq!(std::fs::read(outdir.join("_assets/logo.png")).unwrap(), png);
    assert!(!outdir.join("app.js").exists(), "scripts are not copied by this step");
    assert!(outdir.join("css-bundle-X.css").exists());
    assert_eq!(summary.copied_assets, vec![outdir.join("_assets").join("logo.png")]);
}

#[tokio::test]
async fn test_missing_bundle_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let outdir = build_dir(temp_dir.path());

    let files = vec![
        OutputFile::new(outdir.join("app.js"), "console.log('app');"),
        OutputFile::new(outdir.join("logo.png"), vec![1, 2, 3]),
        // Right name, wrong directory
        OutputFile::new(temp_dir.path().join("css-bundle-X.css"), ".a {}"),
    ];
    let context = BuildContext::new(&outdir);

    let summary = write_processed_output(&context, &files).await.unwrap();

    assert!(summary.is_none());
    assert!(!outdir.exists(), "no directories or files should be created");
    assert!(!temp_dir.path().join("css-bundle-X.css").exists());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let temp_dir = tempfile::tempdir().unwrap();
    let outdir = build_dir(temp_dir.path());

    let files = vec![
        OutputFile::new(
            outdir.join("css-bundle-X.css"),
            ".a { color: red; }\n.b { color: blue; }\n.a { color: red; }\n",
        ),
        OutputFile::new(outdir.join("font.woff2"), vec![7, 7, 7]),
    ];
    let context = BuildContext::new(&outdir)
        .with_sourcemap(true)
        .with_mode(BuildMode::Development);

    write_processed_output(&context, &files).await.unwrap();
    let first_css = std::fs::read(outdir.join("css-bundle-X.css")).unwrap();
    let first_map = std::fs::read(outdir.join("css-bundle-X.css.map")).unwrap();

    write_processed_output(&context, &files).await.unwrap();
    assert_eq!(std::fs::read(outdir.join("css-bundle-X.css")).unwrap(), first_css);
    assert_eq!(std::fs::read(outdir.join("css-bundle-X.css.map")).unwrap(), first_map);
}

#[tokio::test]
async fn test_post_process_output_read_from_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let outdir = build_dir(temp_dir.path());
    let fs_service = TokioFileSystemService;

    fs_service.create_directory(&outdir).await.unwrap();
    fs_service
        .write_file(
            &outdir.join("css-bundle-1.css"),
            b".x { margin: 0; }\n.x { margin: 0; }\n",
        )
        .await
        .unwrap();
    fs_service
        .write_file(&outdir.join("icon.svg"), b"<svg/>")
        .await
        .unwrap();

    let files = fs_service.collect_output_files(&outdir).await.unwrap();
    let summary = write_processed_output(&BuildContext::new(&outdir), &files)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.removed_rules, 1);
    let css = std::fs::read_to_string(outdir.join("css-bundle-1.css")).unwrap();
    assert_eq!(css.matches(".x").count(), 1);
    assert_eq!(std::fs::read(outdir.join("icon.svg")).unwrap(), b"<svg/>");
}

#[tokio::test]
async fn test_invalid_css_fails_without_fallback() {
    let temp_dir = tempfile::tempdir().unwrap();
    let outdir = build_dir(temp_dir.path());

    let files = vec![
        OutputFile::new(outdir.join("css-bundle-X.css"), "..broken { color: red; }\n"),
        OutputFile::new(outdir.join("logo.png"), vec![1]),
    ];

    let result = write_processed_output(&BuildContext::new(&outdir), &files).await;

    let err = result.expect_err("malformed CSS must fail the step");
    assert!(err.format_detailed().contains("css-bundle-X.css"));
    assert!(!outdir.join("css-bundle-X.css").exists());
}
