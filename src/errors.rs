use axum::http::StatusCode;
use thiserror::Error;

/// Failures talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Auth,

    #[error("request failed: {0}")]
    Network(String),

    #[error("unexpected response shape: {0}")]
    DataShape(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::DataShape(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DataShape(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "authentication required".to_string(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let status = match err {
            ApiError::Auth => StatusCode::UNAUTHORIZED,
            ApiError::Network(_) => StatusCode::BAD_GATEWAY,
            ApiError::DataShape(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
