//! CLI command definitions and handlers.

pub mod doctor;
pub mod tag;

use clap::{Parser, Subcommand};

/// Photo Tagger - AI keyword tagging with quality control
#[derive(Parser)]
#[command(name = "photo-tagger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared tagging arguments (paths, thresholds, flags).
    #[command(flatten)]
    pub tag: tag::TagArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Tag photos with AI keywords and quality labels
    Tag(tag::TagArgs),
    /// Check that the model daemon and environment are ready
    Doctor(doctor::DoctorArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Run completed with no quality issues.
    Success,
    /// Run completed; at least one photo had quality issues.
    QualityIssues,
    /// The run could not proceed.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::QualityIssues => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}
