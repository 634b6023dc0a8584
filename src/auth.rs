//! Request identity supplied by the upstream authentication layer.
//!
//! Tokens are verified before requests reach this service; the verified
//! claims arrive as `X-User-Id` and `X-User-Role` headers.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::user::Role;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    fn from_headers(req: &HttpRequest) -> Result<Self, AppError> {
        let id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Access denied. No token provided".to_string()))?;
        let id = Uuid::parse_str(id.trim())
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

        let role = match req.headers().get(USER_ROLE_HEADER) {
            None => Role::default(),
            Some(raw) => raw
                .to_str()
                .ok()
                .and_then(|r| r.trim().parse().ok())
                .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?,
        };

        Ok(Self { id, role })
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(AuthUser::from_headers(req).and_then(|user| match user.role {
            Role::Admin => Ok(AdminUser(user)),
            Role::User => {
                log::debug!("user {} denied admin route {}", user.id, req.path());
                Err(AppError::Forbidden)
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn missing_id_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = AuthUser::extract(&req).await.expect_err("no header");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[actix_web::test]
    async fn malformed_id_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        assert!(matches!(
            AuthUser::extract(&req).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn role_defaults_to_user() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .to_http_request();
        let user = AuthUser::extract(&req).await.expect("valid identity");
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::User);
    }

    #[actix_web::test]
    async fn admin_extractor_rejects_plain_users() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .insert_header((USER_ROLE_HEADER, "user"))
            .to_http_request();
        assert!(matches!(AdminUser::extract(&req).await, Err(AppError::Forbidden)));

        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .insert_header((USER_ROLE_HEADER, "admin"))
            .to_http_request();
        assert!(AdminUser::extract(&req).await.is_ok());
    }
}
