use anyhow::Context;
use clap::Parser;
use llamadocgen::{
    logging, ui, Config, DocumentationPipeline, ModelClient,
    RepoSource, RepositoryAcquirer,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to document: clone URL or local path
    #[arg(long)]
    repo_url: String,

    /// Output directory for the generated documentation
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// API key for the completion endpoint (falls back to OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temp: Option<f32>,

    /// Reuse an existing checkout instead of cloning again
    #[arg(long)]
    skip_clone: bool,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    endpoint: Option<String>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Do not append to the log file
    #[arg(long)]
    no_log_file: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        ui::print_error(&format!("{:#}", e));
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_env();
    apply_cli(&mut config, &cli);
    config.validate()?;

    let api_key = config.require_api_key()?.to_string();

    let log_file = if cli.no_log_file {
        None
    } else {
        config.paths.log_file.clone()
    };
    logging::init(&cli.log_level, log_file.as_deref())?;

    let source = RepoSource::parse(&cli.repo_url);
    log::info!("Documenting {}", source);

    let client = ModelClient::openai(&config.model, &api_key, config.retry.policy())?;
    log::info!("Using model {} at {}", client.model(), config.model.endpoint);
    let acquirer = RepositoryAcquirer::new(source, &config.paths.repos_dir, cli.skip_clone);
    let pipeline = DocumentationPipeline::new(acquirer, client, &config.paths.output_dir)
        .with_progress(true);

    let summary = pipeline.run().await?;
    ui::print_summary(&summary);
    Ok(())
}

fn apply_cli(config: &mut Config, cli: &Cli) {
    if let Some(key) = &cli.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(dir) = &cli.output_dir {
        config.paths.output_dir = dir.clone();
    }
    if let Some(model) = &cli.model {
        config.model.model = model.clone();
    }
    if let Some(temp) = cli.temp {
        config.model.temperature = temp;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.model.endpoint = endpoint.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "llamadocgen",
            "--repo-url",
            "https://github.com/owner/project",
            "--model",
            "gpt-4o",
            "--temp",
            "0.7",
            "--output-dir",
            "docs-out",
        ]);
        let mut config = Config::default();
        apply_cli(&mut config, &cli);

        assert_eq!(config.model.model, "gpt-4o");
        assert!((config.model.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.paths.output_dir, PathBuf::from("docs-out"));
        assert!(!cli.skip_clone);
    }
}
