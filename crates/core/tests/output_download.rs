//! Download integration tests.
//!
//! These tests cover delivery of converted files:
//! - Real PNG to WebP conversion through the production codec
//! - Writing single files and bundles to a directory
//! - Archive entry naming and collisions

use std::io::{Cursor, Read};

use tempfile::TempDir;
use webpify_core::{
    testing::{fixtures, MemorySink, MockCodec},
    BatchConverter, DirectorySink, FileItem, ImageFormat, OutputManager, Session, SourceFile,
    WebpCodec, ZipPackager,
};

async fn convert_with<C: webpify_core::Codec>(codec: C, files: Vec<SourceFile>) -> Vec<FileItem> {
    let mut session = Session::default();
    session.intake(files).unwrap();
    let session = session.into_shared();

    BatchConverter::new(codec).convert_all(&session).await.unwrap();

    let guard = session.read().await;
    guard.items().to_vec()
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).unwrap();
            (file.name().to_string(), contents)
        })
        .collect()
}

#[tokio::test]
async fn test_real_codec_produces_webp() {
    let files = vec![
        SourceFile::new("wide.png", "image/png", fixtures::png_bytes(32, 4)),
        SourceFile::new("tall.png", "image/png", fixtures::png_bytes(3, 20)),
    ];
    let items = convert_with(WebpCodec::new(), files).await;

    for item in &items {
        let output = item.result().unwrap();
        assert_eq!(output.format, ImageFormat::Webp);
        assert_eq!(ImageFormat::sniff(&output.bytes), Some(ImageFormat::Webp));
        assert_eq!(output.converted_size, output.bytes.len() as u64);
    }
    assert_eq!((items[0].result().unwrap().width, items[0].result().unwrap().height), (32, 4));
    assert_eq!((items[1].result().unwrap().width, items[1].result().unwrap().height), (3, 20));
}

#[tokio::test]
async fn test_directory_download_file_and_all() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let items = convert_with(
        MockCodec::new(),
        vec![fixtures::png_file("one.png"), fixtures::png_file("two.png")],
    )
    .await;

    let manager = OutputManager::new(ZipPackager::new(), DirectorySink::new(temp_dir.path()));

    manager.download_file(&items[0]).await.unwrap();
    let written = std::fs::read(temp_dir.path().join("one.webp")).unwrap();
    assert_eq!(written, items[0].result().unwrap().bytes.to_vec());

    manager.download_all(&items).await.unwrap();
    let archive = std::fs::read(temp_dir.path().join("converted-webp-images.zip")).unwrap();
    let names: Vec<String> = zip_entries(&archive).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["one.webp", "two.webp"]);
}

#[tokio::test]
async fn test_single_download_matches_bundle_entry() {
    let items = convert_with(
        MockCodec::new(),
        vec![fixtures::png_file("a.png"), fixtures::png_file("b.png")],
    )
    .await;
    let manager = OutputManager::new(ZipPackager::new().with_deflate(), MemorySink::new());

    let single = manager.download_file(&items[1]).await.unwrap();
    let bundle = manager.download_all(&items).await.unwrap().unwrap();

    let entries = zip_entries(&bundle.bytes);
    let (name, contents) = &entries[1];
    assert_eq!(name, &single.filename);
    assert_eq!(contents, &single.bytes.to_vec());
}

#[tokio::test]
async fn test_failed_items_excluded_from_bundle() {
    let items = convert_with(
        MockCodec::new(),
        vec![
            fixtures::png_file("a.png"),
            fixtures::corrupt_png_file("b.png"),
            fixtures::png_file("c.png"),
        ],
    )
    .await;
    let manager = OutputManager::new(ZipPackager::new(), MemorySink::new());

    let bundle = manager.download_all(&items).await.unwrap().unwrap();
    let names: Vec<String> = zip_entries(&bundle.bytes).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a.webp", "c.webp"]);
}

#[tokio::test]
async fn test_colliding_names_are_disambiguated() {
    let items = convert_with(
        MockCodec::new(),
        vec![
            fixtures::png_file("shot.png"),
            fixtures::png_file("shot.PNG"),
            fixtures::png_file("shot"),
        ],
    )
    .await;
    let manager = OutputManager::new(ZipPackager::new(), MemorySink::new());

    let bundle = manager.download_all(&items).await.unwrap().unwrap();
    let names: Vec<String> = zip_entries(&bundle.bytes).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["shot.webp", "shot (2).webp", "shot (3).webp"]);
}
