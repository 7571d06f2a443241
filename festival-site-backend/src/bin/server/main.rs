use festival_site_backend::error::AppError;
use festival_site_backend::{run_server, AppState};
use festival_site_config::get_config;
use festival_site_core::{FestivalCatalog, JsonFileStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = get_config()?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = JsonFileStore::open(&config.store_path)?;
    info!("using store at {}", store.path().display());

    let state = AppState::new(FestivalCatalog::shipped(), store, config.feedback.clone());

    run_server(state, &config.listen_address).await?.await
}
