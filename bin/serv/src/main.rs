use std::net::SocketAddr;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use sp_api::{
    ApiConfig, ApiState,
    metrics::{init_metrics, metrics_handler, track_metrics},
    middleware::{
        cors::create_cors_layer, request_id::request_id_middleware,
        security_headers::apply_security_headers,
    },
    tracing::init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    init_tracing(&config.env);

    let metrics_handle = init_metrics()?;

    let pool = sp_db::create_pool(&config.database_url, 10).await?;
    sp_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let cors = create_cors_layer(config.parsed_allowed_origins());
    let environment = config.env.clone();
    let state = ApiState::new(config, pool);

    let app = sp_api::router::router()
        .with_state(state)
        .merge(Router::new().route("/metrics", get(metrics_handler)).with_state(metrics_handle))
        .layer(cors)
        .layer(middleware::from_fn(track_metrics))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http());
    let app = apply_security_headers(app, environment);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("Server running on http://localhost:{port}");
    // ConnectInfo is required by the per-route rate limiter's IP extractor.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
