//! HTTP surface over the booking engine.

mod dto;
mod error;
mod handlers;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::dataset;
use crate::engine::{Engine, EngineError};
use crate::limits::MAX_BODY_BYTES;
use crate::model::{Booking, Event};
use crate::observability;

pub use error::ApiError;

/// Shared server state. Queries take the read lock; every mutation runs
/// prepare, write-back and apply under one write lock.
pub struct AppState {
    pub engine: RwLock<Engine>,
    persist_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(engine: Engine, persist_path: Option<PathBuf>) -> Self {
        Self {
            engine: RwLock::new(engine),
            persist_path,
        }
    }

    /// Write the post-event snapshot (if persistence is on), then apply.
    /// A failed write leaves both memory and disk unchanged.
    fn commit(&self, engine: &mut Engine, event: Event) -> Result<Booking, EngineError> {
        if let Some(path) = &self.persist_path {
            dataset::persist_after(path, engine.dataset(), &event)?;
        }
        let booking = engine.apply(event)?;
        observability::record_dataset_size(engine.dealers().len(), engine.bookings().len());
        Ok(booking)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/vehicles/", get(handlers::list_vehicles))
        .route("/api/dealers/", get(handlers::closest_dealers))
        .route("/api/dealers/closest/", get(handlers::closest_dealer))
        .route("/api/dealers/polygon/", post(handlers::dealers_in_polygon))
        .route("/api/bookings/", get(handlers::list_bookings))
        .route("/api/bookings/create/", post(handlers::create_booking))
        .route("/api/bookings/cancel/", post(handlers::cancel_booking))
        .layer(middleware::from_fn(track_requests))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn track_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let response = next.run(req).await;
    observability::record_request(&route, response.status().as_u16(), started);
    response
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
