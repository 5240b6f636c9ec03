use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::Document;
use crate::services::store::USERS_COLLECTION;
use crate::state::AppState;

// GET /api/getUsers
pub async fn get_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Document>>, Response> {
    let users = state.store.list(USERS_COLLECTION).await.map_err(|e| {
        tracing::error!("error fetching users: {e:#}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"message": "Internal server error"})),
        )
            .into_response()
    })?;

    Ok(Json(users))
}
