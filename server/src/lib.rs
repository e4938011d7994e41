use std::future::Future;
use std::time::Duration;

use axum::routing::{delete, get};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod store;

pub use config::{Config, ConfigError, StoreConfig, StoreKind};
pub use error::{ApiError, ApiResult};
pub use store::{MemoryStore, RedisStore, StoreError, TimedStore, TodoStore};

/// Build the router. Each store call is bounded by `request_timeout`; a call
/// that overruns is answered with a 504 error body.
pub fn app<S: TodoStore>(store: S, request_timeout: Duration) -> Router {
    let todos = get(handlers::list_todos::<TimedStore<S>>)
        .post(handlers::create_todo::<TimedStore<S>>)
        .put(handlers::update_todo::<TimedStore<S>>);

    Router::new()
        .route("/", get(handlers::home))
        .route("/todo", todos.clone())
        .route("/todo/", todos)
        .route("/todo/{id}", delete(handlers::delete_todo::<TimedStore<S>>))
        .layer(TraceLayer::new_for_http())
        .with_state(TimedStore::new(store, request_timeout))
}

/// Serve the todo routes on `listener` until `shutdown` resolves.
pub async fn run<S, F>(
    listener: TcpListener,
    store: S,
    request_timeout: Duration,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    S: TodoStore,
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store, request_timeout))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
