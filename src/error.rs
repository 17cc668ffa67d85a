//! Request-level errors and their HTTP mapping

use std::convert::Infallible;

use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::token::TokenError;
use crate::db;
use crate::llm::LlmError;
use crate::upload::UploadError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed, forged or expired credentials
    #[error("Invalid credentials")]
    Unauthenticated,

    #[error("{0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    /// An external API (LLM, image host) failed
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl warp::reject::Reject for AppError {}

impl From<db::Error> for AppError {
    fn from(err: db::Error) -> Self {
        match err {
            db::Error::ConflictError(msg) => AppError::Conflict(msg),
            db::Error::NotFoundError(msg) => AppError::NotFound(msg),
            db::Error::ValidationError(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::Unauthenticated
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MissingFile | UploadError::UnsupportedFormat(_) => {
                AppError::BadRequest(err.to_string())
            }
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// Turn any rejection into a `{"error": ...}` JSON response
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(app_error) = err.find::<AppError>() {
        let status = app_error.status();
        if status.is_server_error() {
            error!("{}", app_error);
        } else {
            warn!("{}", app_error);
        }
        (status, app_error.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidHeader>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported media type".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "error": message })),
        status,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("post".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Conflict("slug".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Upstream("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_errors_map_to_app_errors() {
        let err: AppError = db::Error::ConflictError("dup".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = db::Error::NotFoundError("post 1".into()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = db::Error::PoolError("timeout".into()).into();
        assert!(matches!(err, AppError::Internal(ref m) if m.contains("timeout")));
    }

    #[test]
    fn test_app_error_converts_into_rejection() {
        let rejection: Rejection = AppError::NotFound("post 7".into()).into();
        assert!(!rejection.is_not_found());
        assert!(matches!(
            rejection.find::<AppError>(),
            Some(AppError::NotFound(m)) if m == "post 7"
        ));
    }

    #[tokio::test]
    async fn test_rejection_body_is_json_error() {
        let rejection: Rejection = AppError::Conflict("slug taken".into()).into();
        let response = handle_rejection(rejection).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_token_errors_are_unauthenticated() {
        let err: AppError = TokenError::Expired.into();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[test]
    fn test_upstream_message_passes_through() {
        let err: AppError = LlmError::HttpError {
            status: 503,
            body: "overloaded".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("overloaded"));
    }
}
