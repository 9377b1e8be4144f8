use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use game_review_core::Error as CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Core(CoreError::GameNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Core(
                CoreError::Pgn(_) | CoreError::IllegalMove { .. } | CoreError::Fen(_) | CoreError::Square(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Core(e) => {
                tracing::error!("Backend error: {e}");
                StatusCode::BAD_GATEWAY
            }
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
