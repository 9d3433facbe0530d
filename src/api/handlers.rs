use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::model::{Booking, Dealer, Vehicle};

use super::dto::*;
use super::error::ApiError;
use super::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

// ── Vehicles ─────────────────────────────────────────────────

pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    query: Result<Query<VehiclesQuery>, QueryRejection>,
) -> ApiResult<Vec<Vehicle>> {
    let Query(query) = query?;
    let engine = state.engine.read().await;
    let vehicles = engine
        .vehicles(query.dealer.as_deref(), &query.filter())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(vehicles))
}

// ── Dealers ──────────────────────────────────────────────────

pub async fn closest_dealers(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DealersQuery>, QueryRejection>,
) -> ApiResult<Vec<Dealer>> {
    let Query(query) = query?;
    let point = query.point()?;
    let filter = query.filter();
    let engine = state.engine.read().await;
    let dealers = engine
        .closest_dealers_with_vehicle(&point, &filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(dealers))
}

pub async fn closest_dealer(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DealersQuery>, QueryRejection>,
) -> ApiResult<Dealer> {
    let Query(query) = query?;
    let point = query.point()?;
    let filter = query.filter();
    let engine = state.engine.read().await;
    engine
        .closest_dealer_with_vehicle(&point, &filter)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no dealer has a matching vehicle".into()))
}

pub async fn dealers_in_polygon(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PolygonBody>, JsonRejection>,
) -> ApiResult<Vec<Dealer>> {
    let Json(body) = body?;
    let (vertices, filter) = body.into_parts();
    let engine = state.engine.read().await;
    let dealers = engine
        .dealers_in_polygon(&vertices, &filter)?
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(dealers))
}

// ── Bookings ─────────────────────────────────────────────────

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> ApiResult<Vec<Booking>> {
    let Query(query) = query?;
    let engine = state.engine.read().await;
    let bookings = match query.vehicle_id.as_deref() {
        Some(id) => engine.bookings_for_vehicle(id).into_iter().cloned().collect(),
        None => engine.bookings().to_vec(),
    };
    Ok(Json(bookings))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateBookingBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let Json(body) = body?;
    let mut engine = state.engine.write().await;
    let event = engine.prepare_booking(body.into())?;
    let booking = state.commit(&mut engine, event)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CancelBookingBody>, JsonRejection>,
) -> ApiResult<Booking> {
    let Json(body) = body?;
    let mut engine = state.engine.write().await;
    let event = engine.prepare_cancellation(&body.booking_id, &body.reason)?;
    let booking = state.commit(&mut engine, event)?;
    Ok(Json(booking))
}
