//! Integration tests for sidecar writing.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use photo_tagger_core::{
    BlurAssessment, BlurLevel, PhotoInfo, QualityReport, SidecarSink,
};
use photo_tagger_adapters::xmp::sidecar_path;
use photo_tagger_adapters::XmpSidecarWriter;
use photo_tagger_test_support::SyntheticImageBuilder;
use std::path::Path;

fn photo_on_disk(dir: &Path, name: &str) -> PhotoInfo {
    let built = SyntheticImageBuilder::uniform_gray(8, 8, 100);
    let path = dir.join(name);
    built.image.save(&path).unwrap();
    PhotoInfo::new(path.to_string_lossy().into_owned(), built.image)
}

#[test]
fn test_writes_sidecar_next_to_photo() {
    let dir = tempfile::tempdir().unwrap();
    let photo = photo_on_disk(dir.path(), "shot.png");

    let writer = XmpSidecarWriter::new();
    let tags = vec!["concert".to_string(), "quality:blurry".to_string()];
    let written = writer
        .write(&photo, &tags, &QualityReport::default())
        .expect("write sidecar");

    assert_eq!(written, sidecar_path(Path::new(&photo.path)));
    assert!(written.ends_with("shot.png.xmp"));

    let content = std::fs::read_to_string(&written).unwrap();
    assert!(content.contains("<rdf:li>concert</rdf:li>"));
    assert!(content.contains("<rdf:li>quality:blurry</rdf:li>"));
    assert!(content.contains("xmp:ModifyDate"));
}

#[test]
fn test_quality_report_embedded_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let photo = photo_on_disk(dir.path(), "blurry.png");

    let report = QualityReport {
        blur: Some(BlurAssessment {
            score: 18.5,
            level: BlurLevel::VeryBlurry,
        }),
        ..Default::default()
    };

    let written = XmpSidecarWriter::new()
        .write(&photo, &["quality:very_blurry".to_string()], &report)
        .expect("write sidecar");

    let content = std::fs::read_to_string(written).unwrap();
    assert!(content.contains("Quality Analysis:"));
    assert!(content.contains("very_blurry"));

    // The embedded report survives an escape/unescape round trip.
    let start = content.find("Quality Analysis: ").unwrap() + "Quality Analysis: ".len();
    let end = content[start..].find("</photoshop:Instructions>").unwrap() + start;
    let json = content[start..end]
        .replace("&quot;", "\"")
        .replace("&amp;", "&");
    let parsed: QualityReport = serde_json::from_str(&json).expect("embedded report parses");
    let blur = parsed.blur.expect("blur record");
    assert_eq!(blur.level, BlurLevel::VeryBlurry);
}

#[test]
fn test_rewrite_overwrites_existing_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let photo = photo_on_disk(dir.path(), "twice.png");
    let writer = XmpSidecarWriter::new();

    writer
        .write(&photo, &["first".to_string()], &QualityReport::default())
        .unwrap();
    let written = writer
        .write(&photo, &["second".to_string()], &QualityReport::default())
        .unwrap();

    let content = std::fs::read_to_string(written).unwrap();
    assert!(!content.contains("<rdf:li>first</rdf:li>"));
    assert!(content.contains("<rdf:li>second</rdf:li>"));
}
