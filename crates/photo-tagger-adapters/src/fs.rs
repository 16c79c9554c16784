//! Filesystem adapter for loading photos.

use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage};
use photo_tagger_core::{ImageSource, PhotoInfo};
use rawloader::{RawImage, RawImageData};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supported image extensions.
const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];
const RAW_EXTENSIONS: &[&str] = &["arw", "cr2", "cr3", "nef", "raf", "dng", "orf", "rw2"];

/// Filesystem image source adapter.
pub struct FsImageSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsImageSource {
    /// Creates a new filesystem image source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Collects all photo files from the configured paths.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if is_supported_photo(path) {
                    files.push(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files.sort();
        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_supported_photo(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl ImageSource for FsImageSource {
    fn photos(&self) -> Box<dyn Iterator<Item = Result<PhotoInfo>> + Send + '_> {
        let files = self.collect_files();
        debug!("Found {} photo files", files.len());

        Box::new(files.into_iter().map(|path| load_photo(&path)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.collect_files().len())
    }
}

/// Checks if a path has a supported photo extension.
#[must_use]
pub fn is_supported_photo(path: &Path) -> bool {
    extension(path).is_some_and(|e| {
        RASTER_EXTENSIONS.contains(&e.as_str()) || RAW_EXTENSIONS.contains(&e.as_str())
    })
}

/// Checks if a path has a RAW extension.
#[must_use]
pub fn is_raw_photo(path: &Path) -> bool {
    extension(path).is_some_and(|e| RAW_EXTENSIONS.contains(&e.as_str()))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Loads a photo from the filesystem.
fn load_photo(path: &Path) -> Result<PhotoInfo> {
    let image = if is_raw_photo(path) {
        load_raw_photo(path)?
    } else {
        image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))?
    };

    Ok(PhotoInfo::new(path.to_string_lossy().into_owned(), image))
}

/// Loads a RAW file and develops it to RGB.
fn load_raw_photo(path: &Path) -> Result<DynamicImage> {
    let raw = rawloader::decode_file(path)
        .with_context(|| format!("Failed to decode RAW: {}", path.display()))?;
    develop_raw(&raw).with_context(|| format!("Failed to develop RAW: {}", path.display()))
}

/// Develops a decoded RAW frame into an 8-bit RGB image.
///
/// Quality analysis only needs coarse pixel statistics, so instead of a
/// full demosaic each 2x2 CFA quad collapses into one RGB pixel (greens
/// averaged), normalized by the per-color black and white levels. The
/// result is half-resolution, which is irrelevant to variance and
/// histogram measures.
fn develop_raw(raw: &RawImage) -> Result<DynamicImage> {
    anyhow::ensure!(
        raw.width >= 2 && raw.height >= 2,
        "RAW frame too small: {}x{}",
        raw.width,
        raw.height
    );

    let samples: Vec<f32> = match &raw.data {
        RawImageData::Integer(data) => data.iter().map(|&v| f32::from(v)).collect(),
        RawImageData::Float(data) => data.clone(),
    };
    anyhow::ensure!(
        samples.len() >= raw.width * raw.height * raw.cpp,
        "truncated RAW data: {} samples for {}x{}x{}",
        samples.len(),
        raw.width,
        raw.height,
        raw.cpp
    );

    if raw.cpp == 3 {
        return Ok(develop_interleaved(raw, &samples));
    }

    let out_width = raw.width / 2;
    let out_height = raw.height / 2;
    let mut rgb = RgbImage::new(out_width as u32, out_height as u32);

    for oy in 0..out_height {
        for ox in 0..out_width {
            let mut sums = [0.0f32; 3];
            let mut counts = [0u32; 3];

            for (dy, dx) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                let y = oy * 2 + dy;
                let x = ox * 2 + dx;
                let color = raw.cfa.color_at(y, x).min(3);
                // Index 3 is the second green of an RGGB-style pattern.
                let channel = if color == 3 { 1 } else { color };
                let value = normalize(samples[y * raw.width + x], raw, color);
                sums[channel] += value;
                counts[channel] += 1;
            }

            let pixel = [
                quantize(sums[0], counts[0]),
                quantize(sums[1], counts[1]),
                quantize(sums[2], counts[2]),
            ];
            rgb.put_pixel(ox as u32, oy as u32, image::Rgb(pixel));
        }
    }

    Ok(DynamicImage::ImageRgb8(rgb))
}

/// Develops already-interleaved RGB raw data (cpp == 3).
fn develop_interleaved(raw: &RawImage, samples: &[f32]) -> DynamicImage {
    let mut rgb = RgbImage::new(raw.width as u32, raw.height as u32);
    for y in 0..raw.height {
        for x in 0..raw.width {
            let base = (y * raw.width + x) * 3;
            let pixel = [
                quantize(normalize(samples[base], raw, 0), 1),
                quantize(normalize(samples[base + 1], raw, 1), 1),
                quantize(normalize(samples[base + 2], raw, 2), 1),
            ];
            rgb.put_pixel(x as u32, y as u32, image::Rgb(pixel));
        }
    }
    DynamicImage::ImageRgb8(rgb)
}

/// Scales one sample into 0.0..=255.0 using the color's black/white levels.
fn normalize(value: f32, raw: &RawImage, color: usize) -> f32 {
    let black = f32::from(raw.blacklevels[color]);
    let white = f32::from(raw.whitelevels[color]);
    let range = (white - black).max(1.0);
    ((value - black) / range).clamp(0.0, 1.0) * 255.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(sum: f32, count: u32) -> u8 {
    if count == 0 {
        return 0;
    }
    (sum / count as f32).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_photo() {
        assert!(is_supported_photo(Path::new("test.jpg")));
        assert!(is_supported_photo(Path::new("test.JPEG")));
        assert!(is_supported_photo(Path::new("test.png")));
        assert!(is_supported_photo(Path::new("test.arw")));
        assert!(is_supported_photo(Path::new("test.NEF")));
        assert!(!is_supported_photo(Path::new("test.txt")));
        assert!(!is_supported_photo(Path::new("test")));
    }

    #[test]
    fn test_is_raw_photo() {
        assert!(is_raw_photo(Path::new("dsc001.ARW")));
        assert!(is_raw_photo(Path::new("dsc001.dng")));
        assert!(!is_raw_photo(Path::new("dsc001.jpg")));
    }

    #[test]
    fn test_quantize_rounds_and_clamps() {
        assert_eq!(quantize(0.0, 0), 0);
        assert_eq!(quantize(510.0, 2), 255);
        assert_eq!(quantize(127.4, 1), 127);
        assert_eq!(quantize(127.6, 1), 128);
        assert_eq!(quantize(900.0, 1), 255);
    }
}
