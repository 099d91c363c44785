use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::watch;

use anchorspan::application::ports::{JobRepository, WordExtractor};
use anchorspan::application::services::{
    BatchRunner, DocumentExtractor, ExtractionWorker, JobRunner,
};
use anchorspan::infrastructure::llm::build_field_completer;
use anchorspan::infrastructure::observability::{TracingConfig, init_tracing};
use anchorspan::infrastructure::persistence::{
    InMemoryJobRepository, PgJobRepository, create_pool, run_migrations,
};
use anchorspan::infrastructure::storage::{DocumentStoreFactory, LocalDocumentStore};
use anchorspan::infrastructure::text_processing::JsonWordExtractor;
use anchorspan::presentation::{AppState, Settings, create_router};

#[derive(Parser)]
#[command(name = "anchorspan", version, about = "Anchor-based field extraction from positioned word tokens")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// HTTP API plus the background extraction worker (default).
    Serve,
    /// Runs a dataset file through extraction and prints the report as JSON.
    Batch {
        /// JSON list of `{document_path, extraction_schema}` items.
        #[arg(long)]
        dataset: PathBuf,
        /// Directory that `document_path` entries are relative to.
        #[arg(long)]
        documents: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (settings, environment) = Settings::load()?;

    init_tracing(&TracingConfig::new(
        environment.as_str(),
        settings.logging.level.as_deref(),
        settings.logging.enable_json || environment.prefers_json_logs(),
    ))?;
    tracing::info!(environment = %environment, "Application starting");

    let completer = build_field_completer(&settings.llm)?;
    let extractor = Arc::new(DocumentExtractor::new(
        completer,
        settings.fallback.clone(),
        settings.engine.clone(),
    ));
    let word_extractor: Arc<dyn WordExtractor> = Arc::new(JsonWordExtractor::new());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings, extractor, word_extractor).await,
        Command::Batch { dataset, documents } => {
            run_batch(dataset, documents, extractor, word_extractor).await
        }
    }
}

async fn run_batch(
    dataset: PathBuf,
    documents: PathBuf,
    extractor: Arc<DocumentExtractor>,
    word_extractor: Arc<dyn WordExtractor>,
) -> anyhow::Result<()> {
    let store = Arc::new(LocalDocumentStore::new(documents)?);
    let runner = BatchRunner::new(store, word_extractor, extractor);

    let dataset = BatchRunner::load_dataset(&dataset).await?;
    let outputs = runner.run(&dataset).await?;

    let failed = outputs.iter().filter(|o| o.error.is_some()).count();
    tracing::info!(items = outputs.len(), failed, "Batch finished");
    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

async fn serve(
    settings: Settings,
    extractor: Arc<DocumentExtractor>,
    word_extractor: Arc<dyn WordExtractor>,
) -> anyhow::Result<()> {
    let job_repository: Arc<dyn JobRepository> = match &settings.database {
        Some(database) => {
            let pool = create_pool(database).await?;
            run_migrations(&pool).await?;
            Arc::new(PgJobRepository::new(pool))
        }
        None => {
            tracing::warn!("No database configured; jobs are kept in memory");
            Arc::new(InMemoryJobRepository::new())
        }
    };
    let document_store = DocumentStoreFactory::create(&settings.storage)?;

    let job_runner = Arc::new(JobRunner::new(
        job_repository,
        document_store,
        Arc::clone(&word_extractor),
        Arc::clone(&extractor),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = settings.worker.enabled.then(|| {
        let worker = ExtractionWorker::new(
            Arc::clone(&job_runner),
            Duration::from_millis(settings.worker.poll_interval_ms),
            settings.worker.batch_size,
            shutdown_rx,
        );
        tokio::spawn(worker.run())
    });

    let state = AppState {
        job_runner,
        extractor,
        word_extractor,
        worker_secret: settings.worker.secret.clone(),
    };
    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tx.send(true).ok();
    if let Some(worker) = worker {
        worker.await?;
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
