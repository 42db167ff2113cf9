//! Prompt enhancer powered by promptsmith.
//!
//! Reads a prompt, rewrites it under the prompt-engineering frameworks that
//! fit it using a local Ollama model, and prints and saves the enhanced and
//! unified prompts. Settings come from flags, then environment variables
//! (`MODEL_PROVIDER`, `OLLAMA_MODEL`, `OLLAMA_URL`, ...) and an optional
//! `.env` file.
//!
//! # Examples
//!
//! ```sh
//! # One-shot mode
//! promptsmith --prompt "Compare Postgres and SQLite for a mobile app"
//!
//! # Interactive mode
//! promptsmith
//!
//! # Pipe a long prompt, print only
//! cat brief.txt | promptsmith --stdin --no-save
//! ```

use std::io;

use clap::Parser;
use promptsmith::prelude::*;
use promptsmith_cli::{Cli, compose_file, init_tracing, read_prompt, report};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    // Compose-only mode never touches the model.
    if let Some(path) = &cli.compose_only {
        println!("{}", compose_file(path)?);
        return Ok(());
    }

    let mut config = EnhancerConfig::from_env()?;
    cli.apply(&mut config);

    let prompt = read_prompt(&cli, &mut io::stdin().lock(), &mut io::stdout())?;
    if prompt.is_empty() {
        return Err("empty prompt".to_string());
    }

    let provider = build_provider(&config)?;
    let catalog = config.load_catalog()?;

    let result = enhance_with_retry(
        provider.as_ref(),
        &catalog,
        &prompt,
        config.max_frameworks,
        &config.retry,
    )
    .await?;

    println!("\n{}", report(&result));

    if !cli.no_save {
        let path = save_markdown(&config.output_dir, &result.to_markdown())?;
        println!("Saved prompt to: {}", path.display());
    }
    Ok(())
}
