//! `/metrics` and `/logs`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::log_buffer::LogBuffer;
use crate::metrics::ModemMetrics;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<ModemMetrics>,
    pub logs: Arc<LogBuffer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    /// Kept as text, anything that isn't an integer means "everything"
    pub count: Option<String>,
}

impl LogsQuery {
    fn count(&self) -> Option<i64> {
        self.count.as_deref().and_then(|c| c.trim().parse().ok())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/logs", get(logs_handler))
        .with_state(state)
}

/// Bind `0.0.0.0:port` and serve until `shutdown` resolves.
pub async fn serve<F>(port: u16, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    log::info!("listening on http://{}", addr);

    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("serve http")
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => {
            let content_type = [(header::CONTENT_TYPE, ModemMetrics::content_type())];
            (content_type, body).into_response()
        }
        Err(err) => {
            log::error!("couldn't encode metrics: {:#}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("# {:#}\n", err)).into_response()
        }
    }
}

/// One `<time> [<level>] <description>` line per entry, newest last.
async fn logs_handler(State(state): State<AppState>, Query(query): Query<LogsQuery>) -> String {
    state
        .logs
        .query(query.count())
        .iter()
        .map(|entry| format!("{}\n", entry))
        .collect()
}
