use thiserror::Error;
use tokio::net::TcpListener;
use todo_server::{
    logging, shutdown_signal, Config, ConfigError, MemoryStore, RedisStore, StoreError, StoreKind,
    TodoStore,
};
use tracing::{error, info, warn};

#[derive(Debug, Error)]
enum BootError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("document store: {0}")]
    Store(#[from] StoreError),
    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), BootError> {
    let config = Config::from_env()?;
    logging::init_logging(&config.log_level);

    let result = match config.store.kind {
        StoreKind::Redis => match RedisStore::connect(&config.store).await {
            Ok(store) => serve(&config, store).await,
            Err(err) => Err(err.into()),
        },
        StoreKind::Memory => {
            warn!("using the in-memory store; items are lost on exit");
            serve(&config, MemoryStore::new()).await
        }
    };

    if let Err(err) = &result {
        error!(%err, "todo server stopped");
    }
    result
}

async fn serve<S: TodoStore>(config: &Config, store: S) -> Result<(), BootError> {
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "listening");
    todo_server::run(listener, store, config.request_timeout, shutdown_signal()).await?;
    info!("shutdown complete");
    Ok(())
}
