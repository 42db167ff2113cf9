//! Command-line front end for promptsmith.
//!
//! The binary reads a prompt, enhances it through the selected frameworks
//! with a local model, prints the result, and saves it as Markdown. The
//! pieces here are kept in the library so they can be tested without a
//! terminal or a model server.
//!
//! ```sh
//! # One-shot mode
//! promptsmith --prompt "Write a blog post about our Q3 results"
//!
//! # Interactive mode (asks for a prompt)
//! promptsmith --model llama3.1:8b
//!
//! # Compose a unified prompt from an existing enhanced file
//! promptsmith --compose-only enhanced_prompts/enhanced_prompt_20250101_120000.md
//! ```

use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use promptsmith::compose::compose;
use promptsmith::config::EnhancerConfig;
use promptsmith::pipeline::Enhancement;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Enhance prompts with prompt-engineering frameworks.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "promptsmith", version)]
pub struct Cli {
    /// Prompt to enhance (one-shot mode). Without this, asks interactively.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Read the whole prompt from standard input.
    #[arg(long, conflicts_with = "prompt")]
    pub stdin: bool,

    /// Framework definitions file. Defaults to the bundled definitions.
    #[arg(long, value_name = "PATH")]
    pub frameworks: Option<PathBuf>,

    /// Directory for saved Markdown results [default: enhanced_prompts].
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Ollama model [default: gpt-oss:20b].
    #[arg(long)]
    pub model: Option<String>,

    /// Ollama generate endpoint URL.
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Model provider [default: ollama].
    #[arg(long)]
    pub provider: Option<String>,

    /// Maximum frameworks applied to one prompt [default: 3].
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_frameworks: Option<u64>,

    /// Retries for transient model errors [default: 0].
    #[arg(long)]
    pub retries: Option<u32>,

    /// Print results without saving a Markdown file.
    #[arg(long)]
    pub no_save: bool,

    /// Skip model calls and compose a unified prompt from this file.
    #[arg(long, value_name = "FILE")]
    pub compose_only: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Override `config` with every flag that was given.
    pub fn apply(&self, config: &mut EnhancerConfig) {
        if let Some(path) = &self.frameworks {
            config.frameworks_path = Some(path.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.ollama_model = model.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.ollama_url = url.clone();
        }
        if let Some(provider) = &self.provider {
            config.provider = provider.clone();
        }
        if let Some(max) = self.max_frameworks {
            config.max_frameworks = usize::try_from(max).unwrap_or(usize::MAX);
        }
        if let Some(retries) = self.retries {
            config.retry.max_retries = retries;
        }
    }
}

/// Install the global tracing subscriber writing to stderr.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Get the prompt from `--prompt`, all of `input` (`--stdin`), or one line
/// typed after an `Enter your prompt: ` banner. The result is trimmed.
pub fn read_prompt(
    cli: &Cli,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<String, String> {
    if let Some(prompt) = &cli.prompt {
        return Ok(prompt.trim().to_string());
    }

    let mut prompt = String::new();
    if cli.stdin {
        input
            .read_to_string(&mut prompt)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
    } else {
        write!(output, "Enter your prompt: ")
            .and_then(|()| output.flush())
            .map_err(|e| format!("failed to write prompt banner: {e}"))?;
        input
            .read_line(&mut prompt)
            .map_err(|e| format!("failed to read prompt: {e}"))?;
    }
    Ok(prompt.trim().to_string())
}

/// Console report for one enhancement run.
pub fn report(enhancement: &Enhancement) -> String {
    let mut out = format!(
        "Selected Frameworks: {}\n\n--- Enhanced Prompt ---\n\n{}\n",
        enhancement.frameworks.join(", "),
        enhancement.enhanced
    );
    if enhancement.show_unified() {
        out.push_str(&format!(
            "\n--- Unified Prompt ---\n\n{}\n",
            enhancement.unified
        ));
    }
    out
}

/// Run the composer on an existing enhanced-text file.
pub fn compose_file(path: &Path) -> Result<String, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Ok(compose(&text))
}
