use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use scanscribe::pipeline::TracingProgress;
use scanscribe::{load_config, validate_config, Config, Pipeline, PipelineConfig};

/// Extract page-level text from PDFs with OCR, falling back to the embedded text layer.
#[derive(Parser, Debug)]
#[command(name = "scanscribe", version, about = "PDF text extraction with OCR fallback")]
struct Cli {
    /// PDF documents to process. Results keep this order.
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the JSON results.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for rendered page images.
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Drop OCR lines below this confidence (0.0 to 1.0).
    #[arg(long)]
    min_confidence: Option<f32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = resolve_config(&cli)?;
    let pipeline_config = Arc::new(PipelineConfig::from_config(&config));
    let output_file = pipeline_config.output_file.clone();

    let pipeline = Pipeline::from_config(pipeline_config)
        .context("Failed to initialise the OCR engine")?;

    let report = pipeline.run(&cli.documents, &TracingProgress);

    report
        .records
        .write_json(&output_file)
        .with_context(|| format!("Failed to write results to {}", output_file.display()))?;

    tracing::info!(
        records = report.records.len(),
        documents = report.summary.documents,
        pages = report.summary.total_pages(),
        "Results written to {}",
        output_file.display()
    );

    Ok(())
}

fn init_logging() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    tracing_log::LogTracer::init().context("Failed to bridge log records into tracing")?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output_file = output.to_string_lossy().into_owned();
    }
    if let Some(image_dir) = &cli.image_dir {
        config.image_directory = image_dir.to_string_lossy().into_owned();
    }
    if cli.min_confidence.is_some() {
        config.ocr.min_confidence = cli.min_confidence;
    }

    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}
