//! HTTP handlers over the shared road network

use std::sync::Arc;

use axum::error_handling::HandleErrorLayer;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{BoxError, Json, Router};
use fesroute_core::prelude::{
    AxisRecord, Congestion, Coordinate, PathResult, RouteQuery, TrafficLevel, TrafficTag,
    congestion_class, route,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ApiError, ErrorResponse};
use crate::state::{AppState, Snapshot};

/// Routes plus the middleware stack configured in `config`
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(config.request_timeout())
            .concurrency_limit(config.max_concurrent_requests.max(1)),
    )
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/axes", get(list_axes).put(replace_axes))
        .route("/api/routes/compute", post(compute_route))
        .route("/api/routes/geojson", post(route_geojson))
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> impl IntoResponse {
    let status = if err.is::<tower::timeout::error::Elapsed>() {
        StatusCode::REQUEST_TIMEOUT
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ErrorResponse { error: err.to_string() }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot().await;
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "axes": snapshot.segments.len(),
        "nodes": snapshot.network.node_count(),
        "edges": snapshot.network.edge_count(),
    }))
}

#[derive(Debug, Deserialize)]
struct AxesParams {
    #[serde(default)]
    traffic: TrafficLevel,
}

/// Axis as drawn on the map
#[derive(Debug, Serialize)]
struct AxisView {
    id: i64,
    name: String,
    from_place: String,
    to_place: String,
    coordinates: Vec<Coordinate>,
    traffic: TrafficTag,
    congestion: Congestion,
    color: &'static str,
}

async fn list_axes(
    State(state): State<AppState>,
    Query(params): Query<AxesParams>,
) -> Json<Vec<AxisView>> {
    let snapshot = state.snapshot().await;
    let axes = snapshot
        .segments
        .iter()
        .map(|segment| {
            let congestion = congestion_class(segment.id, params.traffic);
            AxisView {
                id: segment.id,
                name: segment.name.clone(),
                from_place: segment.from_place.clone(),
                to_place: segment.to_place.clone(),
                coordinates: segment.coordinates.clone(),
                traffic: segment.traffic.clone(),
                congestion,
                color: congestion.color(),
            }
        })
        .collect();
    Json(axes)
}

#[derive(Debug, Serialize, Deserialize)]
struct NetworkSummary {
    axes: usize,
    nodes: usize,
    edges: usize,
}

async fn replace_axes(
    State(state): State<AppState>,
    Json(records): Json<Vec<AxisRecord>>,
) -> Result<Json<NetworkSummary>, ApiError> {
    let config = Arc::clone(&state.routing);
    let snapshot =
        tokio::task::spawn_blocking(move || Snapshot::build(&records, &config)).await??;

    let summary = NetworkSummary {
        axes: snapshot.segments.len(),
        nodes: snapshot.network.node_count(),
        edges: snapshot.network.edge_count(),
    };
    state.replace(snapshot).await;
    info!(
        axes = summary.axes,
        nodes = summary.nodes,
        edges = summary.edges,
        "Road network replaced"
    );
    Ok(Json(summary))
}

async fn solve(state: &AppState, query: RouteQuery) -> Result<PathResult, ApiError> {
    let snapshot = state.snapshot().await;
    let config = Arc::clone(&state.routing);
    let result =
        tokio::task::spawn_blocking(move || route(&snapshot.network, &query, &config)).await??;
    info!(
        distance_km = result.distance_km,
        duration_min = result.duration_min,
        traffic = %result.traffic_level,
        "Route computed"
    );
    Ok(result)
}

async fn compute_route(
    State(state): State<AppState>,
    Json(query): Json<RouteQuery>,
) -> Result<Json<PathResult>, ApiError> {
    Ok(Json(solve(&state, query).await?))
}

async fn route_geojson(
    State(state): State<AppState>,
    Json(query): Json<RouteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let result = solve(&state, query).await?;
    Ok(Json(result.to_geojson()?))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, Response};
    use fesroute_core::prelude::{FallbackPolicy, RoutingConfig};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn axis(id: i64, name: &str, coords: &str, trafic: Option<&str>) -> AxisRecord {
        AxisRecord {
            id,
            nom: name.to_string(),
            coords: Some(coords.to_string()),
            trafic: trafic.map(str::to_string),
            ..AxisRecord::default()
        }
    }

    fn test_app() -> Router {
        let config = RoutingConfig::default();
        let snapshot = Snapshot::build(
            &[axis(
                1,
                "Avenue Hassan II",
                "[[34.03,-5.00],[34.04,-5.01]]",
                Some("fluide"),
            )],
            &config,
        )
        .unwrap();
        app(AppState::new(config, snapshot), &ServerConfig::default())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn query(start: (f64, f64), end: (f64, f64), level: &str) -> Value {
        json!({
            "startPoint": {"lat": start.0, "lng": start.1},
            "endPoint": {"lat": end.0, "lng": end.1},
            "trafficLevel": level,
        })
    }

    #[tokio::test]
    async fn health_reports_network_size() {
        let app = test_app();
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["nodes"], 2);
        assert_eq!(body["edges"], 1);
    }

    #[tokio::test]
    async fn computes_route_between_clicked_points() {
        let app = test_app();
        let body = query((34.0301, -5.0001), (34.0399, -5.0099), "normal");
        let response = send(&app, Method::POST, "/api/routes/compute", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let result = json_body(response).await;
        assert_eq!(result["coordinates"].as_array().unwrap().len(), 4);
        assert_eq!(result["coordinates"][0]["lat"], 34.0301);
        assert_eq!(result["legs"][0]["segment_name"], "Avenue Hassan II");
        assert_eq!(result["legs"][0]["traffic"], "fluide");
        assert_eq!(result["traffic_level"], "normal");
    }

    #[tokio::test]
    async fn far_point_is_not_found() {
        let app = test_app();
        let body = query((35.0, -5.0), (34.04, -5.01), "light");
        let response = send(&app, Method::POST, "/api/routes/compute", Some(body)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No route near the selected start point");
    }

    #[tokio::test]
    async fn out_of_range_point_is_bad_request() {
        let app = test_app();
        let body = query((394.03, -5.0), (34.04, -5.01), "normal");
        let response = send(&app, Method::POST, "/api/routes/compute", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("start point"));
    }

    #[tokio::test]
    async fn disconnected_points_are_unprocessable() {
        let app = test_app();
        let axes = json!([
            {"id": 1, "nom": "Nord", "coords": "[[34.03,-5.00],[34.035,-5.00]]"},
            {"id": 2, "nom": "Sud", "coords": "[[34.03,-4.99],[34.035,-4.99]]"},
        ]);
        let response = send(&app, Method::PUT, "/api/axes", Some(axes)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let summary = json_body(response).await;
        assert_eq!(summary["axes"], 2);
        assert_eq!(summary["nodes"], 4);

        let body = query((34.03, -5.00), (34.035, -4.99), "normal");
        let response = send(&app, Method::POST, "/api/routes/compute", Some(body)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No route between these points");
    }

    #[tokio::test]
    async fn axes_are_coloured_by_global_level() {
        let app = test_app();
        let axes = json!([
            {
                "id": 10,
                "nom": "Route de Sefrou",
                "coords": "[[34.03,-5.00],[34.04,-5.01]]",
                "trafic": "dense",
            },
            {"id": 7, "nom": "", "coords": "[(-5.01, 34.04), (-5.02, 34.05)]"},
        ]);
        let response = send(&app, Method::PUT, "/api/axes", Some(axes)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/api/axes?traffic=heavy", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let axes = json_body(response).await;
        assert_eq!(axes[0]["congestion"], "severe");
        assert_eq!(axes[0]["color"], "#F44336");
        assert_eq!(axes[0]["traffic"], "dense");
        assert_eq!(axes[1]["name"], "Axe 7");
        assert_eq!(axes[1]["color"], "#4CAF50");
        assert_eq!(axes[1]["coordinates"][0]["lat"], 34.04);

        let response = send(&app, Method::GET, "/api/axes", None).await;
        let axes = json_body(response).await;
        assert_eq!(axes[0]["congestion"], "fluid");
    }

    #[tokio::test]
    async fn route_exports_as_feature_collection() {
        let app = test_app();
        let body = query((34.03, -5.00), (34.04, -5.01), "heavy");
        let response = send(&app, Method::POST, "/api/routes/geojson", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let collection = json_body(response).await;
        assert_eq!(collection["type"], "FeatureCollection");
        assert!(!collection["features"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn strict_fallback_rejects_bad_axes() {
        let config = RoutingConfig {
            fallback: FallbackPolicy::Strict,
            ..RoutingConfig::default()
        };
        let app = app(
            AppState::new(config, Snapshot::default()),
            &ServerConfig::default(),
        );
        let axes = json!([{"id": 4, "nom": "Bab Ftouh", "coords": "not coordinates"}]);
        let response = send(&app, Method::PUT, "/api/axes", Some(axes)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
