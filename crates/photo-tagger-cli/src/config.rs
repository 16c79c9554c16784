//! Configuration file support for photo-tagger.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/photo-tagger/config.toml` (lowest priority)
//! - Project-local: `.photo-tagger.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Quality check settings.
    pub quality: QualitySection,
    /// Concert mode settings.
    pub concert: ConcertSection,
    /// Ollama daemon settings.
    pub ollama: OllamaSection,
    /// Output settings.
    pub output: OutputSection,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Quality check configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct QualitySection {
    /// Enable/disable the blur check.
    pub blur: Option<bool>,
    /// Enable/disable the histogram check.
    pub histogram: Option<bool>,
    /// Laplacian-variance blur threshold (> 0).
    pub blur_threshold: Option<f64>,
    /// Clip-fraction exposure threshold (0.0-1.0).
    pub exposure_threshold: Option<f64>,
}

/// Concert mode configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ConcertSection {
    /// Enable concert-mode analysis.
    pub enabled: Option<bool>,
    /// Low-light mean brightness threshold (0-255).
    pub low_light_threshold: Option<f64>,
}

/// Ollama daemon configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaSection {
    /// Daemon base URL.
    pub url: Option<String>,
    /// Vision-language model name.
    pub model: Option<String>,
}

/// Output configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Maximum tags written per photo.
    pub max_tags: Option<usize>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/photo-tagger/config.toml`
    /// 2. Project-local: `.photo-tagger.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        // Validate merged config
        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.quality.blur_threshold {
            if t <= 0.0 {
                return Err(format!("quality.blur_threshold must be > 0, got {t}"));
            }
        }
        if let Some(t) = self.quality.exposure_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!(
                    "quality.exposure_threshold must be 0.0-1.0, got {t}"
                ));
            }
        }
        if let Some(t) = self.concert.low_light_threshold {
            if !(0.0..=255.0).contains(&t) {
                return Err(format!(
                    "concert.low_light_threshold must be 0-255, got {t}"
                ));
            }
        }
        if let Some(n) = self.output.max_tags {
            if n == 0 {
                return Err("output.max_tags must be at least 1".to_string());
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Quality
        self.quality.blur = other.quality.blur.or(self.quality.blur);
        self.quality.histogram = other.quality.histogram.or(self.quality.histogram);
        self.quality.blur_threshold = other.quality.blur_threshold.or(self.quality.blur_threshold);
        self.quality.exposure_threshold = other
            .quality
            .exposure_threshold
            .or(self.quality.exposure_threshold);

        // Concert
        self.concert.enabled = other.concert.enabled.or(self.concert.enabled);
        self.concert.low_light_threshold = other
            .concert
            .low_light_threshold
            .or(self.concert.low_light_threshold);

        // Ollama
        self.ollama.url = other.ollama.url.or_else(|| self.ollama.url.take());
        self.ollama.model = other.ollama.model.or_else(|| self.ollama.model.take());

        // Output
        self.output.max_tags = other.output.max_tags.or(self.output.max_tags);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photo-tagger").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.photo-tagger.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".photo-tagger.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.quality.blur_threshold.is_none());
        assert!(config.concert.enabled.is_none());
        assert!(config.ollama.model.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: AppConfig = toml::from_str(toml).expect("parse empty config");
        assert!(config.quality.blur.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[general]
recursive = true

[quality]
blur = true
histogram = true
blur_threshold = 120.0
exposure_threshold = 0.15

[concert]
enabled = true
low_light_threshold = 40.0

[ollama]
url = 'http://localhost:11434'
model = 'llava:13b'

[output]
max_tags = 10
progress = false
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.general.recursive, Some(true));
        assert_eq!(config.quality.blur_threshold, Some(120.0));
        assert_eq!(config.quality.exposure_threshold, Some(0.15));
        assert_eq!(config.concert.enabled, Some(true));
        assert_eq!(config.concert.low_light_threshold, Some(40.0));
        assert_eq!(config.ollama.model, Some("llava:13b".to_string()));
        assert_eq!(config.output.max_tags, Some(10));
        assert_eq!(config.output.progress, Some(false));
    }

    #[test]
    fn test_merge_configs() {
        let mut base: AppConfig = toml::from_str(
            r"
[quality]
blur_threshold = 100.0
exposure_threshold = 0.1
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[quality]
blur_threshold = 150.0

[concert]
enabled = true
",
        )
        .expect("parse override");

        base.merge(override_config);

        // Blur threshold overridden
        assert_eq!(base.quality.blur_threshold, Some(150.0));
        // Exposure preserved from base
        assert_eq!(base.quality.exposure_threshold, Some(0.1));
        // Concert added from override
        assert_eq!(base.concert.enabled, Some(true));
    }

    #[test]
    fn test_merge_preserves_base_when_override_is_none() {
        let mut base: AppConfig = toml::from_str(
            r"
[ollama]
url = 'http://box:11434'
model = 'llava:7b'
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[ollama]
model = 'llava:13b'
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.ollama.url, Some("http://box:11434".to_string()));
        assert_eq!(base.ollama.model, Some("llava:13b".to_string()));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[quality]
blur_threshold = 90.0
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());

        assert_eq!(base.quality.blur_threshold, Some(90.0));
    }

    #[test]
    fn test_invalid_toml_syntax_handled() {
        let toml = r"
[quality
blur_threshold = 0.5
";
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "invalid TOML should return error");
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let toml = r#"
[quality]
blur_threshold = "not a number"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "type mismatch should return error");
    }

    #[test]
    fn test_validate_blur_threshold_out_of_range() {
        let mut config = AppConfig::default();
        config.quality.blur_threshold = Some(-5.0);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("quality.blur_threshold"));
    }

    #[test]
    fn test_validate_exposure_threshold_out_of_range() {
        let mut config = AppConfig::default();
        config.quality.exposure_threshold = Some(1.5);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("quality.exposure_threshold"));
    }

    #[test]
    fn test_validate_low_light_threshold_out_of_range() {
        let mut config = AppConfig::default();
        config.concert.low_light_threshold = Some(300.0);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("concert.low_light_threshold"));
    }

    #[test]
    fn test_validate_zero_max_tags() {
        let mut config = AppConfig::default();
        config.output.max_tags = Some(0);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("output.max_tags"));
    }

    #[test]
    fn test_validate_empty_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(dir.path().join(".photo-tagger.toml"), "").expect("write");

        let found = find_config_in_parents(&nested).expect("should find config");
        assert_eq!(found, dir.path().join(".photo-tagger.toml"));
    }
}
