use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, AppState};

/// Requires `Authorization: Bearer <token>` and attaches the decoded
/// [`AuthUser`](crate::services::AuthUser) to the request extensions. The
/// caller is copied onto the response so the request logger can label it.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;

    let caller = state
        .auth_service()
        .verify_token(token)
        .map_err(|_| ApiError::unauthorized())?;

    let span = tracing::Span::current();
    span.record("user_id", caller.user_id.as_str());
    span.record("role", caller.role.as_str());
    request.extensions_mut().insert(caller.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(caller);
    Ok(response)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
