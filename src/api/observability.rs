use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::replays::ACCOUNT_GUID_HEADER;
use crate::api::AppState;

/// `GET /api/metrics`
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.prometheus_handle.as_ref() {
        Some(handle) => PrometheusHandle::render(handle).into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics are disabled").into_response(),
    }
}

/// What gets attached to the request span before the handler runs.
///
/// Viewer GUIDs are never logged, only whether one was supplied, so the
/// request log cannot be used to undo profile redaction.
struct RequestMeta {
    method: String,
    path: String,
    route: Option<String>,
    viewer_kind: &'static str,
    search_mode: Option<String>,
}

impl RequestMeta {
    fn of(req: &Request) -> Self {
        let route = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched| matched.as_str().to_string());

        let viewer_kind = if req.headers().contains_key(ACCOUNT_GUID_HEADER) {
            "identified"
        } else {
            "anonymous"
        };

        let search_mode = req.uri().query().and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "mode")
                .map(|(_, value)| value.into_owned())
        });

        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            route,
            viewer_kind,
            search_mode,
        }
    }

    /// Matched route if there is one, so label cardinality stays bounded.
    fn metrics_path(&self) -> &str {
        self.route.as_deref().unwrap_or("unmatched")
    }
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "success"
    }
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let meta = RequestMeta::of(&req);

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %meta.method,
        path = %meta.path,
        route = meta.route.as_deref(),
        viewer = meta.viewer_kind,
        search_mode = meta.search_mode.as_deref(),
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();

        let labels = [
            ("method", meta.method.clone()),
            ("path", meta.metrics_path().to_string()),
            ("status", status.as_u16().to_string()),
            ("viewer", meta.viewer_kind.to_string()),
        ];
        metrics::counter!("replay_api_requests_total", &labels).increment(1);
        metrics::histogram!("replay_api_request_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());

        info!(
            event = "http_request_finished",
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            status_code = status.as_u16(),
            outcome = outcome(status),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str, viewer: Option<&str>) -> Request {
        let mut builder = Request::builder().uri(uri);
        if let Some(viewer) = viewer {
            builder = builder.header(ACCOUNT_GUID_HEADER, viewer);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn picks_search_mode_from_query_string() {
        let meta = RequestMeta::of(&request("/api/search?query=box&mode=map&page=1", None));

        assert_eq!(meta.search_mode.as_deref(), Some("map"));
        assert_eq!(meta.viewer_kind, "anonymous");
        assert_eq!(meta.metrics_path(), "unmatched");
    }

    #[test]
    fn search_mode_is_percent_decoded() {
        let meta = RequestMeta::of(&request("/api/search?mode=player+ooc+name&query=x", None));
        assert_eq!(meta.search_mode.as_deref(), Some("player ooc name"));

        let meta = RequestMeta::of(&request("/api/search?mode=Round%20Id&query=1", None));
        assert_eq!(meta.search_mode.as_deref(), Some("Round Id"));
    }

    #[test]
    fn viewer_guid_is_reduced_to_a_kind() {
        let meta = RequestMeta::of(&request(
            "/api/replays",
            Some("6f1c3a52-9d4e-4b1a-8c3e-2f7a9b0d1e11"),
        ));

        assert_eq!(meta.viewer_kind, "identified");
        assert!(meta.search_mode.is_none());
    }

    #[test]
    fn outcome_follows_status_class() {
        assert_eq!(outcome(StatusCode::OK), "success");
        assert_eq!(outcome(StatusCode::UNAUTHORIZED), "client_error");
        assert_eq!(outcome(StatusCode::INTERNAL_SERVER_ERROR), "error");
    }
}
