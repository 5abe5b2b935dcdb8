use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::User;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::AuthError;

/// Extension type carrying the resolved principal in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Middleware that resolves the bearer token to a user and adds it to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req)?.to_string();

    let user = state.auth_service.resolve_current_user(&token).await?;

    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}

/// Middleware that only lets superusers through.
///
/// Must run after [`authenticate`].
pub async fn require_superuser(req: Request, next: Next) -> Result<Response, ApiError> {
    let Some(AuthenticatedUser(user)) = req.extensions().get::<AuthenticatedUser>().cloned()
    else {
        tracing::error!("Superuser gate reached without an authenticated user");
        return Err(AuthError::Unauthorized.into());
    };

    if let Err(e) = user.ensure_superuser() {
        tracing::warn!("Superuser access denied");
        return Err(e.into());
    }

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Unauthorized)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::Unauthorized)?;

    parse_bearer(auth_str).ok_or_else(|| AuthError::Unauthorized.into())
}

/// Split `Bearer <token>`; the scheme is case-insensitive.
fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
