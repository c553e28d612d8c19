use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topic_annotator::config::Config;
use topic_annotator::mmif::metadata::AppMetadata;
use topic_annotator::mmif::Mmif;
use topic_annotator::model::TopicModel;
use topic_annotator::output::terminal;
use topic_annotator::pipeline::annotate::Annotator;
use topic_annotator::pipeline::batch::{self, BatchTarget};
use topic_annotator::text::LocationReader;
use topic_annotator::topics::inference::NmfTopicScorer;

/// Topic annotator: tags MMIF text documents with their most likely topics.
///
/// With no arguments, serves the annotator over HTTP. `-t INFILE OUTFILE`
/// annotates a single file instead.
#[derive(Parser)]
#[command(name = "topic-annotator", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Annotate INFILE and write the result to OUTFILE instead of serving
    #[arg(short = 't', long = "test", requires_all = ["infile", "outfile"])]
    test: bool,

    /// Development mode: debug logging and permissive CORS
    #[arg(long)]
    develop: bool,

    /// Input MMIF file (with -t)
    infile: Option<PathBuf>,

    /// Output MMIF file (with -t)
    outfile: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every *.json MMIF file in a directory
    Batch {
        /// Directory of input MMIF files
        in_dir: PathBuf,

        /// Directory to write annotated files to (same file names)
        out_dir: PathBuf,

        /// POST each file to a running annotator instead of annotating locally
        #[arg(long)]
        endpoint: Option<String>,

        /// Number of files to annotate in parallel (default: 1)
        #[arg(long, default_value = "1")]
        concurrency: usize,
    },

    /// List the model's topics and their labels
    Topics,

    /// List the documents in a MMIF file
    Documents {
        /// The MMIF file to inspect
        file: PathBuf,
    },

    /// Print the app metadata
    Metadata,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up structured logging
    let default_filter = if cli.develop {
        "topic_annotator=debug"
    } else {
        "topic_annotator=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = Config::load()?;

    match cli.command {
        Some(Commands::Batch {
            in_dir,
            out_dir,
            endpoint,
            concurrency,
        }) => {
            let target = match endpoint {
                Some(url) => {
                    info!(endpoint = %url, "Annotating through remote endpoint");
                    BatchTarget::endpoint(&url)?
                }
                None => BatchTarget::Local(build_annotator(&config)?),
            };

            let report = batch::run(&target, &in_dir, &out_dir, concurrency).await?;
            terminal::display_batch_report(&report);
            if !report.failed.is_empty() {
                anyhow::bail!("{} of the input files failed", report.failed.len());
            }
        }

        Some(Commands::Topics) => {
            let model = load_model(&config)?;
            terminal::display_topics(&model.labels, config.skipped_topic);
        }

        Some(Commands::Documents { file }) => {
            let mmif = read_mmif(&file)?;
            terminal::display_documents(&mmif);
        }

        Some(Commands::Metadata) => {
            println!("{}", AppMetadata::topic_modeling().to_json(true));
        }

        None if cli.test => {
            // requires_all guarantees both paths under -t
            let (Some(infile), Some(outfile)) = (cli.infile, cli.outfile) else {
                anyhow::bail!("-t needs both INFILE and OUTFILE");
            };
            let annotator = build_annotator(&config)?;
            println!("{}", annotator.metadata().to_json(true));

            let annotated = annotator.annotate(read_mmif(&infile)?).await?;
            std::fs::write(&outfile, annotated.to_json(true)?)
                .with_context(|| format!("Failed to write {}", outfile.display()))?;

            println!();
            terminal::display_views(&annotated);
            println!(
                "\n{} {}",
                "Wrote".green(),
                outfile.display().to_string().bold()
            );
        }

        None => {
            let annotator = build_annotator(&config)?;
            serve(annotator, &config, cli.develop).await?;
        }
    }

    Ok(())
}

#[cfg(feature = "web")]
async fn serve(annotator: Annotator, config: &Config, develop: bool) -> Result<()> {
    topic_annotator::web::run_server(annotator, &config.bind, config.port, develop).await
}

#[cfg(not(feature = "web"))]
async fn serve(_annotator: Annotator, _config: &Config, _develop: bool) -> Result<()> {
    anyhow::bail!(
        "This build has no HTTP server. Rebuild with --features web, or use -t INFILE OUTFILE."
    )
}

fn load_model(config: &Config) -> Result<TopicModel> {
    config.require_models()?;
    TopicModel::load(&config.model_dir, config.num_top_words)
}

fn build_annotator(config: &Config) -> Result<Annotator> {
    let model = Arc::new(load_model(config)?);
    info!(
        topics = model.n_topics(),
        display = config.num_topic_display,
        skipped = ?config.skipped_topic,
        "Topic model ready"
    );

    let scorer = NmfTopicScorer::new(model, config.num_topic_display, config.skipped_topic);
    let reader = LocationReader::new(Duration::from_secs(config.fetch_timeout_secs))?;
    Ok(Annotator::new(Arc::new(scorer), Arc::new(reader)))
}

fn read_mmif(path: &Path) -> Result<Mmif> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Mmif::from_json(&raw).with_context(|| format!("{} is not a MMIF file", path.display()))
}
