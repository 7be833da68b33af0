use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("movie catalog request failed")]
    Upstream(#[source] anyhow::Error),

    #[error("movie collection store failed")]
    Store(#[from] sea_orm::DbErr),

    #[error("movie collection store is not configured")]
    StoreUnavailable,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(anyhow::anyhow!(msg.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_)
            | AppError::Store(_)
            | AppError::StoreUnavailable
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::Conflict(msg) => {
                msg.clone()
            },
            AppError::Upstream(_) => "Failed to reach the movie catalog".to_string(),
            AppError::Store(_) | AppError::StoreUnavailable => {
                "Failed to access the movie collection".to_string()
            },
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the API key.
        Self::Upstream(anyhow::Error::new(err.without_url()))
    }
}

impl From<jiff::Error> for AppError {
    fn from(err: jiff::Error) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Attached to every error response so that [`attach_error_details`] can
/// expose the full chain outside production.
#[derive(Clone, Debug)]
pub struct ErrorReport {
    pub message: String,
    pub details: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();
        let details = self.chain();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %details, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %details, "request rejected");
        }

        let mut resp = (status, Json(json!({ "success": false, "error": message }))).into_response();
        resp.extensions_mut().insert(ErrorReport { message, details });
        resp
    }
}

pub async fn attach_error_details(resp: Response) -> Response {
    let Some(report) = resp.extensions().get::<ErrorReport>().cloned() else {
        return resp;
    };
    let status = resp.status();
    let body = json!({ "success": false, "error": report.message, "details": report.details });
    (status, Json(body)).into_response()
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn conflict_maps_to_bad_request() {
        assert_eq!(AppError::Conflict("dup".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("gone").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::StoreUnavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn server_errors_hide_their_cause() {
        let err = AppError::Upstream(anyhow::anyhow!("connection refused to 10.0.0.1"));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to reach the movie catalog");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn details_are_attached_on_request() {
        let err = AppError::Upstream(anyhow::anyhow!("connection refused"));
        let resp = attach_error_details(err.into_response()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(resp).await;
        assert_eq!(json["details"], "movie catalog request failed: connection refused");
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let json = body_json(AppError::validation("Title and genre are required").into_response()).await;
        assert_eq!(json["error"], "Title and genre are required");
    }
}
