//! HTTP server startup

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::routing::create_router;
use crate::startup::AppState;

/// Bind and serve until the process is stopped
pub async fn start_server(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
  let app = create_router(state).layer(
    ServiceBuilder::new()
      .layer(TraceLayer::new_for_http())
      .layer(CorsLayer::permissive()),
  );

  let listener = TcpListener::bind(addr).await?;
  tracing::info!(%addr, "listening");
  axum::serve(listener, app).await?;
  Ok(())
}
