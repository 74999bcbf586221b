use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and spawns its upkeep task.
///
/// Returns `Ok(None)` when observability is disabled. Must be called from
/// within a Tokio runtime.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Label for the `path` dimension. Unmatched requests share one label so
/// arbitrary URIs cannot grow the series count.
fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned())
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = route_label(&req);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router exposing the Prometheus scrape endpoint.
pub fn metrics_app<S>(handle: PrometheusHandle) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics helpers

/// `outcome` is `success`, `partial` or `failed`.
pub fn track_application_bootstrapped(outcome: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("applications_bootstrapped_total", "outcome" => outcome).increment(1);
}

pub fn track_user_registered(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_registered_total", "role" => role.to_string()).increment(1);
}

pub fn track_login(success: bool) {
    if !is_observability_enabled() {
        return;
    }
    let status = if success { "success" } else { "failure" };
    counter!("user_logins_total", "status" => status).increment(1);
}

/// `decision` is `authorized`, `unauthenticated` or `forbidden`.
pub fn track_authorization_decision(decision: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("authorization_decisions_total", "decision" => decision).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    fn label_capturing_router(seen: Arc<Mutex<Vec<String>>>) -> Router {
        Router::new()
            .route("/api/users/{id}", get(|| async { "ok" }))
            .layer(middleware::from_fn(move |req: Request, next: Next| {
                seen.lock().unwrap().push(route_label(&req));
                next.run(req)
            }))
    }

    #[tokio::test]
    async fn test_route_label_uses_route_template() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router = label_capturing_router(seen.clone());

        for uri in ["/api/users/1", "/api/users/2", "/random/a", "/random/b"] {
            let request = axum::http::Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            router.clone().oneshot(request).await.unwrap();
        }

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["/api/users/{id}", "/api/users/{id}", "unmatched", "unmatched"]
        );
    }
}
