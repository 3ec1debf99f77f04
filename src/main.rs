use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use estimate_generator::{
    AppConfig, BatchOrchestrator, DocumentRenderer, MarkupRenderer, TemplateCache,
    TemplateEngine, TemplateSelection, TypstRenderer,
};

/// Renders every record in the data directory as an estimate and as a
/// transaction statement.
#[derive(Debug, Parser)]
#[command(name = "estimate", version)]
struct Cli {
    /// Template to use; omit (or pass "all") to render with every template.
    #[arg(short, long, conflicts_with_all = ["all", "default"])]
    template: Option<String>,

    /// Render with every discovered template.
    #[arg(long, conflicts_with = "default")]
    all: bool,

    /// Render with the configured `default_template` only.
    #[arg(long)]
    default: bool,

    /// Print the available templates and exit.
    #[arg(long)]
    list_templates: bool,

    #[arg(long, env = "ESTIMATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[arg(long, env = "ESTIMATE_TEMPLATE_DIR")]
    template_dir: Option<PathBuf>,

    #[arg(long, env = "ESTIMATE_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Write the Typst source instead of compiling PDFs.
    #[arg(long)]
    emit_markup: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = cli.template_dir {
        config.template_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let cache = Arc::new(TemplateCache::new());
    let engine = TemplateEngine::new(
        config.template_dir.clone(),
        &config.template_extension,
        cache.clone(),
    );

    if cli.list_templates {
        for template in engine.discover().await? {
            println!("{}", template);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let renderer: Arc<dyn DocumentRenderer> = if cli.emit_markup {
        Arc::new(MarkupRenderer::new())
    } else {
        Arc::new(TypstRenderer::new(config.typst_binary.clone(), config.render_timeout()))
    };

    let selection = if cli.all {
        TemplateSelection::All
    } else if cli.default {
        TemplateSelection::configured_default(&config)
    } else {
        TemplateSelection::from_arg(cli.template.as_deref())
    };

    tracing::info!(?selection, data_dir = ?config.data_dir, "Starting estimate generator");

    let orchestrator = BatchOrchestrator::new(&config, engine, renderer);
    let summary = match orchestrator.run(&selection).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("✗ {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::debug!(stats = ?cache.get_stats().await, "Template cache");

    for generated in &summary.succeeded {
        println!("✓ {}", generated.output_path.display());
    }
    for failed in &summary.failed {
        println!(
            "✗ {} - {} - {}: {}",
            failed.combination.record.display(),
            failed.combination.template_id,
            failed.combination.document_type,
            failed.error
        );
    }
    println!(
        "\nProcessed {} combinations: {} generated, {} failed (output: {})",
        summary.total(),
        summary.succeeded.len(),
        summary.failed.len(),
        config.output_dir.display()
    );

    Ok(ExitCode::SUCCESS)
}
