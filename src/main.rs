use std::sync::Arc;

use account_store::app::build_router;
use account_store::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Si RUST_LOG n'est pas défini, utiliser ces règles par défaut
        tracing_subscriber::EnvFilter::new(
            "info,account_store=debug,hyper_util=warn,tower_http=info",
        )
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// ----------------- Main -----------------

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    setup_logging();
    tracing::info!("Starting account-store...");

    let config = Config::from_env()?;

    // Pool + migrations bloquent: hors du runtime
    let service = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || account_store::build_service(&config)).await??
    };
    let app = build_router(Arc::new(service));

    if std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
        tracing::info!("Running in Lambda mode");
        lambda_http::run(app).await
    } else {
        tracing::info!("Running in local HTTP server mode");
        let addr = config.server_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
