use axum::{
    extract::{MatchedPath, Request},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::services::AuthUser;

/// Role label for requests that never passed the bearer check.
const ANONYMOUS: &str = "anonymous";

/// Opens the `request` span every handler runs in and records one counter
/// and one latency sample per request, labelled by route and caller role.
///
/// The auth middleware fills `user_id` and `role` on this span and hands the
/// caller back on the response extensions, which is where the role label is
/// read from.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let route = route_label(&req);

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        route = %route,
        user_id = tracing::field::Empty,
        role = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();
        let role = caller_role(&response);
        let elapsed = started.elapsed();

        record_request(&method, &route, status, role, elapsed.as_secs_f64());

        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if status.is_server_error() {
            warn!(status = status.as_u16(), elapsed_ms, role, "Request failed");
        } else {
            info!(status = status.as_u16(), elapsed_ms, role, "Request finished");
        }

        response
    }
    .instrument(span)
    .await
}

/// Route template when axum matched one, so `/api/sessions/{id}` stays a
/// single label instead of one per session.
fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |p| p.as_str().to_string())
}

fn caller_role(response: &Response) -> &'static str {
    response
        .extensions()
        .get::<AuthUser>()
        .map_or(ANONYMOUS, |caller| caller.role.as_str())
}

fn record_request(method: &Method, route: &str, status: StatusCode, role: &str, secs: f64) {
    let labels = [
        ("method", method.as_str().to_string()),
        ("route", route.to_string()),
        ("status", status.as_u16().to_string()),
        ("role", role.to_string()),
    ];

    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels).record(secs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use axum::body::Body;

    #[test]
    fn test_caller_role_reads_response_extensions() {
        let mut response = Response::new(Body::empty());
        assert_eq!(caller_role(&response), ANONYMOUS);

        response.extensions_mut().insert(AuthUser {
            user_id: "u1".to_string(),
            role: Role::Manager,
        });
        assert_eq!(caller_role(&response), "manager");
    }

    #[test]
    fn test_route_label_falls_back_to_raw_path() {
        let req = Request::builder()
            .uri("/players/abc?x=1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(route_label(&req), "/players/abc");
    }
}
