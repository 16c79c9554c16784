//! XMP sidecar writer.
//!
//! Writes a companion `<name>.<ext>.xmp` file next to each photo holding
//! the merged tag list as a `dc:subject` bag, plus the quality report as
//! JSON inside `photoshop:Instructions`. The original file is never
//! touched.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use photo_tagger_core::{PhotoInfo, QualityReport, SidecarSink};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

const CREATOR_TOOL: &str = concat!("photo-tagger ", env!("CARGO_PKG_VERSION"));

/// XMP sidecar output adapter.
#[derive(Debug, Default)]
pub struct XmpSidecarWriter;

impl XmpSidecarWriter {
    /// Creates a new sidecar writer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SidecarSink for XmpSidecarWriter {
    fn write(
        &self,
        photo: &PhotoInfo,
        tags: &[String],
        report: &QualityReport,
    ) -> Result<PathBuf> {
        let photo_path = Path::new(&photo.path);
        let sidecar = sidecar_path(photo_path);

        let content = render_xmp(tags, report, capture_date(photo_path).as_deref())?;
        std::fs::write(&sidecar, content)
            .with_context(|| format!("Failed to write sidecar: {}", sidecar.display()))?;

        debug!("Wrote sidecar {}", sidecar.display());
        Ok(sidecar)
    }
}

/// Sidecar path for a photo: the full filename with `.xmp` appended.
#[must_use]
pub fn sidecar_path(photo: &Path) -> PathBuf {
    let mut name = photo.as_os_str().to_os_string();
    name.push(".xmp");
    PathBuf::from(name)
}

/// Renders the sidecar document.
fn render_xmp(
    tags: &[String],
    report: &QualityReport,
    capture_date: Option<&str>,
) -> Result<String> {
    let subject_items = tags
        .iter()
        .map(|tag| format!("                    <rdf:li>{}</rdf:li>", xml_escape(tag)))
        .collect::<Vec<_>>()
        .join("\n");

    let modify_date = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"));

    let create_date = capture_date.map_or_else(String::new, |date| {
        format!(
            "\n            <xmp:CreateDate>{}</xmp:CreateDate>",
            xml_escape(date)
        )
    });

    let instructions = if report.is_empty() {
        String::new()
    } else {
        let json = serde_json::to_string(report).context("Failed to serialize quality report")?;
        format!(
            "\n            <photoshop:Instructions>Quality Analysis: {}</photoshop:Instructions>",
            xml_escape(&json)
        )
    };

    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/" x:xmptk="{CREATOR_TOOL}">
    <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
        <rdf:Description rdf:about=""
            xmlns:dc="http://purl.org/dc/elements/1.1/"
            xmlns:xmp="http://ns.adobe.com/xap/1.0/"
            xmlns:photoshop="http://ns.adobe.com/photoshop/1.0/">
            <dc:subject>
                <rdf:Bag>
{subject_items}
                </rdf:Bag>
            </dc:subject>
            <xmp:CreatorTool>{CREATOR_TOOL}</xmp:CreatorTool>
            <xmp:ModifyDate>{modify_date}</xmp:ModifyDate>{create_date}{instructions}
        </rdf:Description>
    </rdf:RDF>
</x:xmpmeta>
"#
    ))
}

/// Pulls the capture date out of the photo's EXIF block, if any.
fn capture_date(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)
        .or_else(|| exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY))
        .map(|field| field.display_value().to_string())
}

/// Escapes XML metacharacters in text content.
fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_tagger_core::{BlurAssessment, BlurLevel};

    #[test]
    fn test_sidecar_path_appends_to_full_name() {
        assert_eq!(
            sidecar_path(Path::new("/photos/dsc001.arw")),
            PathBuf::from("/photos/dsc001.arw.xmp")
        );
        assert_eq!(
            sidecar_path(Path::new("img.jpg")),
            PathBuf::from("img.jpg.xmp")
        );
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn test_render_contains_tags_in_order() {
        let tags = vec!["dog".to_string(), "quality:blurry".to_string()];
        let xmp = render_xmp(&tags, &QualityReport::default(), None).expect("render");

        let dog = xmp.find("<rdf:li>dog</rdf:li>").expect("dog tag");
        let blurry = xmp
            .find("<rdf:li>quality:blurry</rdf:li>")
            .expect("quality tag");
        assert!(dog < blurry);
        assert!(!xmp.contains("photoshop:Instructions"));
    }

    #[test]
    fn test_render_escapes_tag_content() {
        let tags = vec!["cats & dogs".to_string()];
        let xmp = render_xmp(&tags, &QualityReport::default(), None).expect("render");
        assert!(xmp.contains("<rdf:li>cats &amp; dogs</rdf:li>"));
    }

    #[test]
    fn test_render_embeds_quality_json() {
        let report = QualityReport {
            blur: Some(BlurAssessment {
                score: 12.0,
                level: BlurLevel::Blurry,
            }),
            ..Default::default()
        };
        let xmp = render_xmp(&[], &report, None).expect("render");
        assert!(xmp.contains("photoshop:Instructions"));
        assert!(xmp.contains("&quot;blurry&quot;"));
    }

    #[test]
    fn test_render_includes_capture_date_when_present() {
        let xmp =
            render_xmp(&[], &QualityReport::default(), Some("2024-06-01 20:15:00")).expect("render");
        assert!(xmp.contains("<xmp:CreateDate>2024-06-01 20:15:00</xmp:CreateDate>"));

        let without = render_xmp(&[], &QualityReport::default(), None).expect("render");
        assert!(!without.contains("xmp:CreateDate"));
    }
}
