//! Axum middleware for bearer authentication.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::{field, info_span, warn, Instrument};

use crate::api::error::ApiError;
use crate::auth::models::AuthError;
use crate::auth::token_service::TokenService;

pub type TokenServiceState = Arc<TokenService>;

/// Resolve the `Authorization` header into an [`Identity`](crate::auth::Identity) and attach it to
/// the request extensions.
pub async fn authenticate(
    State(tokens): State<TokenServiceState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let correlation_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "auth_middleware.authenticate",
        http.method = %method,
        http.path = %path,
        auth.subject_id = field::Empty,
        correlation_id = %correlation_id
    );

    let header = request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok());
    let identity = span.in_scope(|| {
        bearer_token(header).and_then(|token| tokens.validate(token)).inspect_err(|err| {
            warn!(%correlation_id, error = %err, "authentication failed");
        })
    })?;

    span.record("auth.subject_id", field::display(&identity.subject_id));
    request.extensions_mut().insert(identity);
    Ok(next.run(request).instrument(span).await)
}

/// Extract the token from a `Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.map(str::trim).filter(|value| !value.is_empty());
    let Some(header) = header else {
        return Err(AuthError::MissingBearer);
    };

    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MalformedBearer)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MalformedBearer);
    }

    Ok(token)
}
