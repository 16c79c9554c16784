//! Doctor command - preflight checks for the tagging environment.

use anyhow::Result;
use clap::Args;
use photo_tagger_adapters::ollama;
use photo_tagger_adapters::OllamaClient;

use super::ExitCode;
use crate::config::AppConfig;

/// Arguments for the doctor command
#[derive(Args)]
pub struct DoctorArgs {
    /// Ollama model name to check for
    #[arg(long)]
    pub model: Option<String>,

    /// Ollama daemon URL
    #[arg(long, value_name = "URL")]
    pub ollama_url: Option<String>,
}

/// Run the doctor command.
///
/// Reports on each external dependency and exits non-zero when the model
/// daemon or the configured model is missing.
pub fn run(args: &DoctorArgs, config: &AppConfig) -> Result<ExitCode> {
    let url = args
        .ollama_url
        .as_deref()
        .or(config.ollama.url.as_deref())
        .unwrap_or(ollama::DEFAULT_URL);
    let model = args
        .model
        .as_deref()
        .or(config.ollama.model.as_deref())
        .unwrap_or(ollama::DEFAULT_MODEL);

    let client = OllamaClient::new(url, model)?;
    let mut healthy = true;

    println!("photo-tagger environment check");
    println!();

    match client.list_models() {
        Ok(models) => {
            report("ollama daemon", &format!("running at {url}"));
            if models.iter().any(|name| name == model) {
                report(&format!("model {model}"), "installed");
            } else {
                healthy = false;
                report(&format!("model {model}"), "MISSING");
                println!("    install it with: ollama pull {model}");
            }
        }
        Err(e) => {
            healthy = false;
            report("ollama daemon", "NOT RUNNING");
            println!("    {e:#}");
            println!("    install Ollama and run: ollama serve");
            report(&format!("model {model}"), "unknown (daemon unreachable)");
        }
    }

    report("raw decoding", "built in (arw, cr2, cr3, nef, raf, dng, orf, rw2)");

    match dirs::config_dir() {
        Some(dir) => {
            let path = dir.join("photo-tagger").join("config.toml");
            if path.exists() {
                report("xdg config", &path.display().to_string());
            } else {
                report("xdg config", "none");
            }
        }
        None => report("xdg config", "no config directory on this platform"),
    }

    match std::env::current_dir() {
        Ok(cwd) if cwd.join(".photo-tagger.toml").exists() => {
            report(
                "project config",
                &cwd.join(".photo-tagger.toml").display().to_string(),
            );
        }
        _ => report("project config", "none in current directory"),
    }

    println!();
    if healthy {
        println!("ready to tag");
        Ok(ExitCode::Success)
    } else {
        println!("environment is not ready");
        Ok(ExitCode::Error)
    }
}

/// Prints one aligned status line.
fn report(label: &str, status: &str) {
    println!("  {label:.<40} {status}");
}
