pub mod handlers;
mod page;
pub mod types;

use crate::{Result, config::Config, session::Session};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use handlers::AppState;

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route(
            "/api/credential",
            post(handlers::submit_credential).delete(handlers::reset_credential),
        )
        .route(
            "/api/dataset",
            post(handlers::upload_dataset).delete(handlers::clear_dataset),
        )
        .route("/api/generate", post(handlers::generate))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let session = Session::new(config.endpoint.clone(), &config.credential);
    if let Some(reason) = session.last_error() {
        warn!("Starting without a usable API token: {}", reason);
    }
    info!(
        "Session starts in state {:?} (credential source: {:?})",
        session.state(),
        session.credential_source()
    );

    let app = router(AppState::new(session), config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
