use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use docfields::application::ports::{StagingStore, StorageProvider};
use docfields::application::services::ExtractionService;
use docfields::infrastructure::google_drive::GoogleDriveProvider;
use docfields::infrastructure::observability::{TracingConfig, init_tracing};
use docfields::infrastructure::storage::LocalStagingStore;
use docfields::infrastructure::text_processing::PdfAdapter;
use docfields::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().context("Failed to read environment")?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(
        &TracingConfig::from_settings(&settings.logging, environment),
        settings.server.port,
    )
    .context("Failed to initialize tracing")?;

    let staging = LocalStagingStore::new(PathBuf::from(&settings.storage.temp_dir))
        .context("Failed to prepare temporary directory")?;
    tracing::info!(temp_dir = %staging.base_path().display(), "Staging store ready");
    let staging_store: Arc<dyn StagingStore> = Arc::new(staging);

    let storage_provider: Arc<dyn StorageProvider> = Arc::new(
        GoogleDriveProvider::new(&settings.provider)
            .context("Failed to configure storage provider")?,
    );
    tracing::info!(
        credentials_path = %settings.provider.credentials_path,
        scope = %settings.provider.scope,
        "Storage provider configured"
    );

    let file_loader = Arc::new(PdfAdapter::new(Duration::from_secs(
        settings.extraction.timeout_secs,
    )));

    let extraction_service = Arc::new(ExtractionService::new(
        file_loader,
        Arc::clone(&storage_provider),
        Arc::clone(&staging_store),
    ));

    let state = AppState {
        extraction_service,
        storage_provider,
        staging_store,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
