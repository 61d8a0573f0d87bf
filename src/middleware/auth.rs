use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use coursekit_auth::{Claims, UserRole, verify_token};
use coursekit_core::AppError;
use coursekit_core::permissions::DRAFTS_READ;
use coursekit_models::{CourseStatus, UserId};

use crate::state::AppState;

/// Extractor that validates the bearer token and provides the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.has_permission(permission)
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format".to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Optional authentication for public reads. No header means anonymous; a
/// header that fails verification is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    /// Status filter for catalog reads: `None` (everything) for callers
    /// allowed to read drafts, otherwise only published courses.
    pub fn visibility(&self) -> Option<CourseStatus> {
        match &self.0 {
            Some(user) => visibility_for(user),
            None => Some(CourseStatus::Published),
        }
    }
}

pub fn visibility_for(user: &AuthUser) -> Option<CourseStatus> {
    if user.has_permission(DRAFTS_READ) {
        None
    } else {
        Some(CourseStatus::Published)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => {
                let claims = verify_token(token, &state.jwt_config)?;
                Ok(MaybeAuthUser(Some(AuthUser(claims))))
            }
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

/// Generates an extractor that authenticates the caller and requires one
/// permission. Runs before the body is read, so a missing permission is
/// reported before any validation.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:path) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = coursekit_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if !auth_user.has_permission($permission) {
                    return Err(coursekit_core::AppError::forbidden(format!(
                        "Access denied. Missing required permission: {}",
                        $permission
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_permission!(RequireCoursesManage, coursekit_core::permissions::COURSES_MANAGE);
require_permission!(RequireModulesManage, coursekit_core::permissions::MODULES_MANAGE);
require_permission!(RequirePagesManage, coursekit_core::permissions::PAGES_MANAGE);
require_permission!(RequireUploadsCreate, coursekit_core::permissions::UPLOADS_CREATE);
