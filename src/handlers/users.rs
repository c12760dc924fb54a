use crate::dtos::{RegisterUserRequest, UserResponse};
use crate::error::AppError;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

/// Registers a new user or returns the existing one. The email is the id,
/// so registering twice is a no-op that returns the same identity.
pub async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let user = state.store.upsert_user(&req.email).await?;

    tracing::info!(email = %user.email, "User registered or fetched");

    Ok(Json(UserResponse {
        id: user.email.clone(),
        email: user.email,
    }))
}
