use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};

use disaster_lens::classify::bundle::ModelBundle;
use disaster_lens::classify::traits::TextClassifier;
use disaster_lens::config::{ClusterSettings, Config};
use disaster_lens::error::AnalysisError;
use disaster_lens::output::terminal;
use disaster_lens::pipeline;
use disaster_lens::posts::loader::load_posts;
use disaster_lens::topics::kmeans::KMeans;

/// disaster-lens: topic clustering, engagement charts and label prediction
/// for disaster posts.
#[derive(Parser)]
#[command(name = "disaster-lens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster posts into topics and write the four interactive charts
    Analyze {
        /// JSON file with an array of posts
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory for the chart pages (default: plots/ next to the binary)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Number of topics (default: 5)
        #[arg(long)]
        clusters: Option<usize>,

        /// Seed for cluster initialisation (default: 0)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Predict target, event type and label for every post in a file
    Classify {
        /// JSON file with an array of posts
        #[arg(long)]
        input: Option<PathBuf>,

        /// Where to write the classified posts (default: classified_posts.json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Directory holding the model artifacts
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },

    /// Predict target, event type and label for a single text
    Predict {
        /// The text to classify
        text: String,

        /// Directory holding the model artifacts
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("disaster_lens=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<AnalysisError>()
                .map(AnalysisError::exit_code)
                .unwrap_or(1);
            error!(error = %e, code, "Run failed");
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load();

    match cli.command {
        Commands::Analyze {
            input,
            output_dir,
            clusters,
            seed,
        } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(dir) = output_dir {
                config.plots_dir = dir;
            }
            let settings = ClusterSettings::load(clusters, seed)?;

            info!(
                input = %config.input_path.display(),
                clusters = settings.clusters,
                seed = settings.seed,
                "Starting topic analysis"
            );
            println!("Analyzing {}...", config.input_path.display());

            let kmeans = KMeans::new(settings.clusters, settings.seed);
            let report = pipeline::analysis::run(&config.input_path, &config.plots_dir, &kmeans)?;

            terminal::display_topic_summary(&report.model);
            terminal::display_written(&report.written);
            println!(
                "\n{}",
                format!(
                    "Analysis completed and interactive charts saved in {}",
                    config.plots_dir.display()
                )
                .bold()
            );
        }

        Commands::Classify {
            input,
            output,
            model_dir,
        } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(output) = output {
                config.classified_output = output;
            }
            if let Some(dir) = model_dir {
                config.model_dir = dir;
            }
            config.require_models()?;

            let bundle = ModelBundle::load(&config.model_dir)?;
            let posts = load_posts(&config.input_path)?;
            println!("Successfully loaded {} posts.", posts.len());

            let results = pipeline::classify::classify_posts(&bundle, &posts)?;
            for result in &results {
                terminal::display_classified(result);
            }

            pipeline::classify::write_classified(&config.classified_output, &results)
                .with_context(|| format!("Saving {} results", results.len()))?;
            println!(
                "{}",
                format!(
                    "Classified {} posts; results saved to {}",
                    results.len(),
                    config.classified_output.display()
                )
                .bold()
            );
        }

        Commands::Predict { text, model_dir } => {
            if let Some(dir) = model_dir {
                config.model_dir = dir;
            }
            config.require_models()?;

            let bundle = ModelBundle::load(&config.model_dir)?;
            let prediction = bundle.classify(&text)?;
            terminal::display_prediction(&prediction);
        }
    }

    Ok(())
}
