use std::sync::Mutex;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use opti::config::ServerConfig;
use opti::{OptimizeRequest, OptimizeResponse, Optimizer, OptimizerConfig};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

async fn optimize(
    State(optimizer): State<Optimizer>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /api/optimize"
    );

    let response = tokio::task::spawn_blocking(move || optimizer.optimize(&req))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "optimizer task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "optimization failed".to_string(),
            )
        })?;

    Ok(Json(response))
}

fn app(optimizer: Optimizer) -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/api/optimize", post(optimize))
        .route("/optimize", post(optimize))
        .with_state(optimizer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    // Sentry has to be up before the runtime spawns its workers
    let _sentry = match config.sentry_dsn.as_deref() {
        Some(dsn) => {
            let dsn = dsn
                .parse::<sentry::types::Dsn>()
                .map_err(|e| std::io::Error::other(format!("invalid SENTRY_DSN: {e}")))?;
            Some(sentry::init(sentry::ClientOptions {
                dsn: Some(dsn),
                release: sentry::release_name!(),
                ..Default::default()
            }))
        }
        None => None,
    };

    let optimizer = Optimizer::new(OptimizerConfig {
        parallel: config.parallel,
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let addr = config.addr();
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            eprintln!("Listening on {addr}");
            axum::serve(listener, app(optimizer)).await
        })
}
