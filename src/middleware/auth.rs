use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::validate_jwt;
use crate::config;
use crate::error::ApiError;
use crate::security::MemberContext;

pub const SITE_HEADER: &str = "x-site-id";

/// Resolves the caller into a `MemberContext` and injects it into the request.
///
/// A bearer token identifies both site and member; the member is re-read from
/// the repository so role and status changes apply immediately. Requests
/// without a token are anonymous on the site named by `X-Site-Id`, or on the
/// configured default site.
pub async fn context_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = match extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)? {
        Some(token) => {
            let claims = validate_jwt(&token)?;
            let member = state
                .repository
                .member(claims.site_id, claims.member_id)
                .await?
                .filter(|m| !m.is_deleted())
                .ok_or_else(|| {
                    tracing::warn!(site_id = %claims.site_id, member_id = %claims.member_id,
                        "Token refers to an unknown or deleted member");
                    ApiError::unauthorized("Member not found")
                })?;
            MemberContext::authenticated(claims.site_id, member)
        }
        None => MemberContext::anonymous(site_from_headers(&headers)?),
    };

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Bearer token from the Authorization header, if one was sent
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token".to_string()),
        Some(token) => Ok(Some(token.trim().to_string())),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}

fn site_from_headers(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    match headers.get(SITE_HEADER) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or_else(|| ApiError::bad_request("Invalid X-Site-Id header")),
        None => config::config()
            .site
            .default_site_id
            .ok_or_else(|| ApiError::bad_request("Missing X-Site-Id header")),
    }
}
