use crate::dtos::DocumentResponse;
use crate::error::AppError;
use crate::middleware::UserId;
use crate::startup::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub async fn analyze_document(
    State(state): State<AppState>,
    user_id: UserId,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
        })?
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file uploaded")))?;

    let filename = field.file_name().map(|s| s.to_string());
    let declared_type = field.content_type().map(|s| s.to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e)))?
        .to_vec();

    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::UnprocessableEntity(anyhow::anyhow!(
            "File too large (max 20MB)"
        )));
    }

    let response = state
        .analysis
        .analyze(
            data,
            declared_type.as_deref(),
            filename.as_deref(),
            &user_id.0,
        )
        .await?;

    Ok(Json(response))
}

pub async fn get_document_history(
    State(state): State<AppState>,
    user_id: UserId,
) -> Result<impl IntoResponse, AppError> {
    let documents = state.store.list(&user_id.0).await?;

    Ok(Json(
        documents
            .into_iter()
            .map(DocumentResponse::from)
            .collect::<Vec<_>>(),
    ))
}

pub async fn get_document(
    State(state): State<AppState>,
    user_id: UserId,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = state.store.get(&document_id, &user_id.0).await?;
    Ok(Json(DocumentResponse::from(document)))
}

pub async fn delete_document(
    State(state): State<AppState>,
    _user_id: UserId,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete(&document_id).await?;

    tracing::info!(document_id = %document_id, "Document deleted");
    Ok(StatusCode::OK)
}
