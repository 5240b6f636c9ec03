use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::{Document, NewBooking};
use crate::services::store::BOOKINGS_COLLECTION;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingActionResponse {
    message: &'static str,
    id: String,
}

// GET /api/getBookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Document>>, Response> {
    let bookings = state.store.list(BOOKINGS_COLLECTION).await.map_err(|e| {
        tracing::error!("error fetching bookings: {e:#}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"message": "Failed to fetch bookings"})),
        )
            .into_response()
    })?;

    Ok(Json(bookings))
}

// POST /api/addBooking
pub async fn add_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBooking>,
) -> Result<Json<BookingActionResponse>, Response> {
    if !body.has_required_fields() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "Missing required fields."})),
        )
            .into_response());
    }

    let id = state
        .store
        .add(BOOKINGS_COLLECTION, body.into_fields())
        .await
        .map_err(|e| {
            tracing::error!("error adding booking: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "Failed to add booking"})),
            )
                .into_response()
        })?;

    Ok(Json(BookingActionResponse {
        message: "Booking added",
        id,
    }))
}

// DELETE /api/deleteBookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookingActionResponse>, Response> {
    state
        .store
        .delete(BOOKINGS_COLLECTION, &id)
        .await
        .map_err(|e| {
            tracing::error!("error deleting booking {id}: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "Failed to delete booking"})),
            )
                .into_response()
        })?;

    Ok(Json(BookingActionResponse {
        message: "Booking deleted",
        id,
    }))
}
