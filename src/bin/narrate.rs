//! `narrate` — run the pipeline once from a transfer file.
//!
//! This is the child-process entry point: the caller writes the
//! `KEY=VALUE` config, provides `OPENAI_API_KEY` in the environment, runs
//! this binary and inspects the exit status.
//!
//! * exit 0 — success; the run summary is printed on stdout.
//! * exit 1 — failure; the error is printed on stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use narration_studio::{
    config::{AppConfig, PipelineConfig},
    llm::ApiRewriter,
    pipeline::{PipelineOrchestrator, RunReport, Workspace},
    tts::ApiSynthesizer,
};

#[derive(Parser, Debug)]
#[command(name = "narrate", about = "Rewrite a manuscript as narration and synthesize it to MP3")]
struct Args {
    /// Transfer file to read (default: <workspace>/.pipeline_config.txt).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Workspace root for rewritten_texts/ and relative paths
    /// (default: from settings.toml, usually the current directory).
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Settings file to use instead of the platform default.
    #[arg(long)]
    settings: Option<PathBuf>,
}

async fn run(args: Args) -> anyhow::Result<RunReport> {
    let mut settings = match &args.settings {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("cannot load settings {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    settings.apply_env_overrides();
    if let Some(root) = args.workspace {
        settings.workspace.root = root;
    }

    let workspace = Workspace::from_config(&settings.workspace);
    let config_path = args.config.unwrap_or_else(|| workspace.transfer_file());
    let run_config = PipelineConfig::load_from(&config_path)?;
    log::info!("loaded run config from {}", config_path.display());

    let mut orchestrator = PipelineOrchestrator::new(
        workspace,
        Arc::new(ApiRewriter::from_config(&settings.rewrite)),
        Arc::new(ApiSynthesizer::from_config(&settings.speech)),
    );
    log::info!("workspace root: {}", orchestrator.workspace().root().display());

    Ok(orchestrator.run(&run_config).await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
