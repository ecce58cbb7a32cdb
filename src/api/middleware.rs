use axum::{
    extract::{Request, State},
    http::header::HOST,
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
};

use crate::api::handlers::{error_response, ErrorResponse, SharedState};
use crate::current;
use crate::model::HttpWorkContext;

/// Resolves the tenant for every request.
///
/// The resolution outcome lands in two places: the request extensions (for
/// the `ResolvedTenant` extractor) and the ambient task-local scope (so the
/// per-tenant options cache sees it without any handler plumbing). An
/// unresolved tenant flows through untouched; only resolver errors fail the
/// request.
pub async fn resolve_tenant(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let ctx = http_work_context(&request);
    let resolved = state.resolver.resolve(&ctx).await.map_err(error_response)?;
    request.extensions_mut().insert(resolved.clone());
    Ok(current::with_tenant(resolved, next.run(request)).await)
}

pub(crate) fn http_work_context(request: &Request) -> HttpWorkContext {
    let mut ctx = HttpWorkContext::new().with_path(request.uri().path());
    for (name, value) in request.headers() {
        if let Ok(value) = value.to_str() {
            ctx.headers
                .insert(name.as_str().to_ascii_lowercase(), value.to_string());
        }
    }
    if let Some(host) = request.headers().get(HOST).and_then(|v| v.to_str().ok()) {
        ctx.host = Some(strip_port(host).to_string());
    }
    ctx
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals keep their brackets.
    if let Some(end) = host.find(']') {
        return &host[..=end];
    }
    host.split(':').next().unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("acme.example.com"), "acme.example.com");
        assert_eq!(strip_port("acme.example.com:8080"), "acme.example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
    }

    #[test]
    fn test_work_context_from_request() {
        let request = axum::http::Request::builder()
            .uri("https://ignored/reports/2026?expand=true")
            .header("Host", "acme.example.com:443")
            .header("X-Tenant-Identifier", "acme")
            .body(Body::empty())
            .unwrap();

        let ctx = http_work_context(&request);
        assert_eq!(ctx.host.as_deref(), Some("acme.example.com"));
        assert_eq!(ctx.path, "/reports/2026");
        assert_eq!(ctx.header("x-tenant-identifier"), Some("acme"));
    }
}
