// src/bin/api_server.rs

use restaurant_reviews::infra::{init_logging, Config};
use restaurant_reviews::transport;
use restaurant_reviews::DatabaseService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::from_env()?;

    // --- Service Initialization ---
    info!(database_url = %config.database_url, "initializing DatabaseService");
    let db_service = DatabaseService::new(&config).await?;
    match db_service.table_counts().await {
        Ok(counts) => {
            for (table, count) in counts {
                info!(table, count, "startup row count");
            }
        }
        Err(e) => warn!(error = %e, "could not read startup row counts"),
    }
    let app_state = transport::http::AppState::new(db_service);

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}
