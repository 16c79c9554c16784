//! Tag command - analyze photos, generate keywords, write sidecars.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use photo_tagger_adapters::{FsImageSource, JsonJournal, OllamaClient, XmpSidecarWriter};
use photo_tagger_adapters::ollama;
use photo_tagger_core::{
    synthesize_quality_tags, Capabilities, ConcertConfig, ImageSource, KeywordProvider,
    ProgressEvent, ProgressJournal, ProgressSink, QualityAnalyzer, QualityConfig, SessionStats,
    SidecarSink,
};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::ProgressBar;

/// Hardcoded default values.
mod defaults {
    pub const BLUR_THRESHOLD: f64 = 100.0;
    pub const EXPOSURE_THRESHOLD: f64 = 0.1;
    pub const LOW_LIGHT_THRESHOLD: f64 = 50.0;
    pub const MAX_TAGS: usize = 8;
}

/// Parse and validate a strictly positive number.
fn parse_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not > 0"))
    }
}

/// Parse and validate a fraction (0.0-1.0).
fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Parse and validate an intensity level (0-255).
fn parse_level(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=255.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0..=255"))
    }
}

/// Shared arguments for photo tagging.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct TagArgs {
    /// Files or directories to tag
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Enable concert photography analysis
    #[arg(long)]
    pub concert_mode: bool,

    /// Disable the blur check
    #[arg(long)]
    pub no_blur: bool,

    /// Disable the histogram check
    #[arg(long)]
    pub no_histogram: bool,

    /// Skip AI keyword generation (quality tags only, works offline)
    #[arg(long)]
    pub no_keywords: bool,

    /// Reprocess photos already recorded in the progress journal
    #[arg(long)]
    pub force: bool,

    /// Laplacian-variance blur threshold (> 0)
    #[arg(long, value_parser = parse_positive)]
    pub blur_threshold: Option<f64>,

    /// Clip-fraction exposure threshold (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub exposure_threshold: Option<f64>,

    /// Low-light mean brightness threshold (0-255)
    #[arg(long, value_parser = parse_level)]
    pub low_light_threshold: Option<f64>,

    /// Ollama model name
    #[arg(long)]
    pub model: Option<String>,

    /// Ollama daemon URL
    #[arg(long, value_name = "URL")]
    pub ollama_url: Option<String>,

    /// Maximum tags written per photo
    #[arg(long)]
    pub max_tags: Option<usize>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl TagArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    ///
    /// For boolean flags: an explicit CLI flag always wins. Config can
    /// enable/disable only when the CLI flag wasn't set.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        // Recursive: config applies only if CLI --recursive not passed
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Check enables: CLI --no-* takes precedence, then config, then default (enabled)
        if !args.no_blur {
            if let Some(enabled) = config.quality.blur {
                args.no_blur = !enabled;
            }
        }
        if !args.no_histogram {
            if let Some(enabled) = config.quality.histogram {
                args.no_histogram = !enabled;
            }
        }
        if !args.concert_mode {
            args.concert_mode = config.concert.enabled.unwrap_or(false);
        }

        // Thresholds: CLI > config (accessor provides hardcoded fallback)
        args.blur_threshold = args.blur_threshold.or(config.quality.blur_threshold);
        args.exposure_threshold = args
            .exposure_threshold
            .or(config.quality.exposure_threshold);
        args.low_light_threshold = args
            .low_light_threshold
            .or(config.concert.low_light_threshold);

        // Ollama: CLI > config
        args.model = args.model.or_else(|| config.ollama.model.clone());
        args.ollama_url = args.ollama_url.or_else(|| config.ollama.url.clone());

        // Output: CLI > config
        args.max_tags = args.max_tags.or(config.output.max_tags);
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    fn blur_threshold(&self) -> f64 {
        self.blur_threshold.unwrap_or(defaults::BLUR_THRESHOLD)
    }

    fn exposure_threshold(&self) -> f64 {
        self.exposure_threshold
            .unwrap_or(defaults::EXPOSURE_THRESHOLD)
    }

    fn low_light_threshold(&self) -> f64 {
        self.low_light_threshold
            .unwrap_or(defaults::LOW_LIGHT_THRESHOLD)
    }

    fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(ollama::DEFAULT_MODEL)
    }

    fn ollama_url(&self) -> &str {
        self.ollama_url.as_deref().unwrap_or(ollama::DEFAULT_URL)
    }

    fn max_tags(&self) -> usize {
        self.max_tags.unwrap_or(defaults::MAX_TAGS)
    }

    fn quality_config(&self) -> QualityConfig {
        QualityConfig {
            check_blur: !self.no_blur,
            check_histogram: !self.no_histogram,
            blur_threshold: self.blur_threshold(),
            exposure_threshold: self.exposure_threshold(),
        }
    }

    fn concert_config(&self) -> ConcertConfig {
        ConcertConfig {
            enabled: self.concert_mode,
            low_light_threshold: self.low_light_threshold(),
        }
    }
}

/// Result of running the tag command.
pub struct TagOutcome {
    /// Final session counters.
    pub stats: SessionStats,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Per-run options for the processing loop.
struct RunOptions {
    force: bool,
    max_tags: usize,
}

/// Run the tag command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &TagArgs) -> Result<TagOutcome> {
    info!("Tagging {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let mut journal = JsonJournal::load(JsonJournal::path_in(&journal_dir(&args.paths)));

    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, args.progress);

    let analyzer = QualityAnalyzer::new(
        &args.quality_config(),
        &args.concert_config(),
        Capabilities::detect(),
    );

    let keyword_provider: Option<OllamaClient> = if args.no_keywords {
        debug!("Keyword generation disabled");
        None
    } else {
        Some(OllamaClient::new(args.ollama_url(), args.model())?)
    };

    let sidecar = XmpSidecarWriter::new();

    let stats = process_photos(
        &source,
        &analyzer,
        keyword_provider
            .as_ref()
            .map(|p| p as &dyn KeywordProvider),
        &sidecar,
        &mut journal,
        &progress_bar,
        &RunOptions {
            force: args.force,
            max_tags: args.max_tags(),
        },
    );

    let exit_code = if stats.quality_issues > 0 {
        ExitCode::QualityIssues
    } else {
        ExitCode::Success
    };

    Ok(TagOutcome { stats, exit_code })
}

/// Directory holding the progress journal: the first scanned directory,
/// or the parent of the first file argument.
fn journal_dir(paths: &[PathBuf]) -> PathBuf {
    let first = &paths[0];
    if first.is_dir() {
        first.clone()
    } else {
        first
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}

/// Process photos through analysis, keyword generation, and sidecar output.
fn process_photos(
    source: &dyn ImageSource,
    analyzer: &QualityAnalyzer,
    keyword_provider: Option<&dyn KeywordProvider>,
    sidecar: &dyn SidecarSink,
    journal: &mut dyn ProgressJournal,
    progress: &dyn ProgressSink,
    options: &RunOptions,
) -> SessionStats {
    let total = source.count_hint();
    let mut stats = SessionStats {
        session_start: iso_timestamp(),
        ..Default::default()
    };

    for (index, item) in source.photos().enumerate() {
        let photo = match item {
            Ok(photo) => photo,
            Err(e) => {
                warn!("Failed to load photo: {e:#}");
                stats.errors += 1;
                progress.on_event(ProgressEvent::Skipped {
                    path: String::from("(unreadable)"),
                    reason: format!("{e:#}"),
                });
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            path: photo.path.clone(),
            index,
            total,
        });

        let path = PathBuf::from(&photo.path);
        if !options.force && journal.is_processed(&path) {
            debug!("Already processed: {}", photo.path);
            stats.skipped += 1;
            progress.on_event(ProgressEvent::Skipped {
                path: photo.path.clone(),
                reason: String::from("already processed"),
            });
            continue;
        }

        let report = analyzer.analyze(&photo);
        let quality_tags = synthesize_quality_tags(&report);
        if !quality_tags.is_empty() {
            stats.quality_issues += 1;
        }

        let ai_keywords = match keyword_provider {
            Some(provider) => match provider.keywords(&photo) {
                Ok(keywords) => keywords,
                Err(e) => {
                    warn!("Keyword generation failed for {}: {e:#}", photo.path);
                    stats.skipped += 1;
                    progress.on_event(ProgressEvent::Skipped {
                        path: photo.path.clone(),
                        reason: format!("keyword generation failed: {e:#}"),
                    });
                    continue;
                }
            },
            None => Vec::new(),
        };

        let tags = merge_tags(ai_keywords, &quality_tags, options.max_tags);

        match sidecar.write(&photo, &tags, &report) {
            Ok(sidecar_path) => {
                debug!("Tagged {} -> {}", photo.path, sidecar_path.display());
                stats.processed += 1;
                journal.mark_processed(&path);
                progress.on_event(ProgressEvent::Tagged {
                    path: photo.path.clone(),
                    tags,
                    quality_tags: quality_tags.len(),
                });
            }
            Err(e) => {
                warn!("Sidecar write failed for {}: {e:#}", photo.path);
                stats.errors += 1;
                progress.on_event(ProgressEvent::Skipped {
                    path: photo.path.clone(),
                    reason: format!("{e:#}"),
                });
            }
        }

        if let Err(e) = journal.save(&stats) {
            warn!("Failed to save journal: {e:#}");
        }
    }

    progress.on_event(ProgressEvent::Finished {
        stats: stats.clone(),
    });

    stats
}

/// Merge AI keywords with quality tags under the tag cap.
///
/// AI keywords are capped first, quality tags appended, and the merged
/// list capped again.
fn merge_tags(mut ai_keywords: Vec<String>, quality_tags: &[String], max_tags: usize) -> Vec<String> {
    ai_keywords.truncate(max_tags);
    ai_keywords.extend_from_slice(quality_tags);
    ai_keywords.truncate(max_tags);
    ai_keywords
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
