/**
 * API REST - HTTP surface of the optimizer
 *
 * ROLE :
 * Maps routes to InventoryService operations and error kinds to status codes.
 * This is the only place that knows about HTTP.
 *
 * HOW IT WORKS :
 * - GET  /inefficient-servers : hostnames at or below the threshold (404 when none)
 * - GET  /hostnames           : same evaluation, empty list allowed
 * - GET  /mock-data           : raw stored inventory
 * - POST /mock-data           : append one record (201)
 * - GET  /health, /system/health
 *
 * SECURITY :
 * - When an API key is configured, header x-api-key is required on all routes except /health*
 * - Every request runs inside a span carrying a fresh request id
 */

use crate::error::{ErrorKind, ServiceError};
use crate::health::ServiceHealth;
use crate::models::{ErrorResponse, HostnameResponse, MessageResponse};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound | ErrorKind::NoInefficientServers => StatusCode::NOT_FOUND,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidThreshold | ErrorKind::MalformedData | ErrorKind::Io => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind);
        debug!(kind = %self.kind, error = %self.message, "request failed");
        let body = ErrorResponse { error: self.message, status_code: status.as_u16() };
        (status, Json(body)).into_response()
    }
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .route("/inefficient-servers", get(get_inefficient_servers))
        .route("/hostnames", get(get_hostnames))
        .route("/mock-data", get(get_mock_data).post(add_mock_data))
        .layer(middleware::from_fn_with_state(app_state.clone(), require_api_key))
        .layer(middleware::from_fn_with_state(app_state.clone(), trace_request))
        .with_state(app_state)
}

async fn trace_request(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        id = %Uuid::new_v4(),
        method = %req.method(),
        path = %req.uri().path(),
    );
    async move {
        let response = next.run(req).await;
        let status = response.status();
        app.health.record_request(status.is_client_error() || status.is_server_error());
        info!(status = status.as_u16(), "request handled");
        response
    }
    .instrument(span)
    .await
}

async fn require_api_key(State(app): State<AppState>, req: Request, next: Next) -> Result<Response, StatusCode> {
    // health checks stay open
    if req.uri().path().starts_with("/health") {
        return Ok(next.run(req).await);
    }
    let Some(expected) = app.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let ok = req
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);

    if !ok {
        warn!("rejected request without a valid api key");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(req).await)
}

// GET /system/health
async fn get_system_health(State(app): State<AppState>) -> Json<ServiceHealth> {
    Json(app.health.get_health(app.inventory.backend(), app.inventory.key()))
}

// GET /inefficient-servers
async fn get_inefficient_servers(State(app): State<AppState>) -> Result<Json<HostnameResponse>, ServiceError> {
    let hostnames = app.inventory.inefficient_servers().await?;
    Ok(Json(HostnameResponse { hostnames: hostnames.into_iter().collect() }))
}

// GET /hostnames
async fn get_hostnames(State(app): State<AppState>) -> Result<Json<HostnameResponse>, ServiceError> {
    let hostnames = app.inventory.hostnames().await?;
    Ok(Json(HostnameResponse { hostnames: hostnames.into_iter().collect() }))
}

// GET /mock-data
async fn get_mock_data(State(app): State<AppState>) -> Result<Response, ServiceError> {
    let bytes = app.inventory.mock_data().await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}

// POST /mock-data
async fn add_mock_data(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageResponse>), ServiceError> {
    app.inventory.add_mock_record(&body).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::success())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InventoryService;
    use crate::store::MemoryRecordStore;
    use axum::body::{self, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(store: MemoryRecordStore, threshold: &str, api_key: Option<&str>) -> Router {
        let inventory = InventoryService::new(Arc::new(store), "ip-config.json", threshold);
        build_router(AppState::new(inventory).with_api_key(api_key.map(str::to_string)))
    }

    async fn json_body(resp: Response) -> serde_json::Value {
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::NoInefficientServers), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::BadRequest), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::InvalidThreshold), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::MalformedData), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::Io), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let resp = app(MemoryRecordStore::new(), "1", None)
            .oneshot(Request::builder().uri("/inefficient-servers").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(resp).await,
            serde_json::json!({"error": "server information not found", "statusCode": 404})
        );
    }

    #[tokio::test]
    async fn test_api_key_required_except_health() {
        let router = app(MemoryRecordStore::new(), "1", Some("secret"));

        let denied = router
            .clone()
            .oneshot(Request::builder().uri("/mock-data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let health = router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let allowed = router
            .oneshot(
                Request::builder()
                    .uri("/mock-data")
                    .header("x-api-key", "secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_system_health_counts_requests() {
        let router = app(MemoryRecordStore::new(), "1", None);
        let _ = router
            .clone()
            .oneshot(Request::builder().uri("/hostnames").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let resp = router
            .oneshot(Request::builder().uri("/system/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let health = json_body(resp).await;
        assert_eq!(health["requests_failed"], 1);
        assert_eq!(health["store_backend"], "memory");
        assert_eq!(health["record_location"], "ip-config.json");
    }
}
