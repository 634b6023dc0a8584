use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(_) | DomainError::NotCancellable => AppError::NotFound(e.to_string()),
            DomainError::InvalidInput(_) | DomainError::CapacityExceeded(_) | DomainError::EmptyCart => {
                AppError::BadRequest(e.to_string())
            }
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("internal error: {detail}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Product not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[actix_web::test]
    async fn internal_detail_is_not_leaked() {
        let resp = AppError::Internal("connection refused".to_string()).error_response();
        let body = to_bytes(resp.into_body()).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["message"], "Internal server error");
    }

    #[actix_web::test]
    async fn body_carries_the_message() {
        let resp = AppError::from(DomainError::CapacityExceeded(10)).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(resp.into_body()).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(
            json["message"],
            "Cart limit reached! You cannot add more than 10 items."
        );
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::not_found("Order").into();
        assert!(matches!(app_err, AppError::NotFound(ref m) if m == "Order not found"));
    }

    #[test]
    fn not_cancellable_maps_to_404() {
        let app_err: AppError = DomainError::NotCancellable.into();
        assert_eq!(app_err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_failures_map_to_400() {
        for err in [
            DomainError::invalid("bad value"),
            DomainError::EmptyCart,
            DomainError::CapacityExceeded(10),
        ] {
            assert_eq!(AppError::from(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn conflict_maps_to_409() {
        let app_err: AppError = DomainError::Conflict("Email already registered".to_string()).into();
        assert_eq!(app_err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
