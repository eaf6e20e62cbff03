//! Identity at the HTTP boundary. Sign-in itself lives in the gateway; this
//! service trusts the user id header the gateway forwards, and the guards
//! below turn it into typed extractor arguments so handlers cannot skip the
//! check by accident.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, Method},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Reads the forwarded user id and stashes it in request extensions. Public
/// endpoints pass through without one.
pub async fn identity_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(header).map_err(|_| AppError::Unauthorized)?;
    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}

fn is_public(method: &Method, path: &str) -> bool {
    let path = path.strip_prefix("/api/v1").unwrap_or(path);
    (*method == Method::POST && path == "/profiles") || (*method == Method::GET && path == "/plans")
}

/// The acting member's id, as placed in extensions by [`identity_middleware`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .extensions
            .get::<Uuid>()
            .copied()
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser { id: user_id })
    }
}

/// The acting admin, resolved against the store. Extraction fails with
/// `Forbidden` for anyone whose role is not admin, so `/admin` handlers can
/// simply take this as an argument.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser { id } = CurrentUser::from_request_parts(parts, state).await?;

        let user = match state.entitlements().resolve_user(id).await {
            Ok(user) => user,
            // A forwarded id that no longer resolves is a stale session.
            Err(AppError::UserNotFound(_)) => return Err(AppError::Unauthorized),
            Err(e) => return Err(e),
        };

        if !user.is_admin() {
            return Err(AppError::Forbidden);
        }

        Ok(CurrentAdmin { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn public_paths_skip_identity() {
        assert!(is_public(&Method::POST, "/api/v1/profiles"));
        assert!(is_public(&Method::POST, "/profiles"));
        assert!(is_public(&Method::GET, "/api/v1/plans"));
        assert!(!is_public(&Method::GET, "/api/v1/profiles"));
        assert!(!is_public(&Method::POST, "/api/v1/interests"));
    }

    #[tokio::test]
    async fn current_user_requires_a_forwarded_id() {
        let (mut parts, _) = Request::builder()
            .uri("/api/v1/interests")
            .body(())
            .unwrap()
            .into_parts();

        let missing = CurrentUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(missing, Err(AppError::Unauthorized)));

        let id = Uuid::new_v4();
        parts.extensions.insert(id);
        let found = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found.id, id);
    }
}
