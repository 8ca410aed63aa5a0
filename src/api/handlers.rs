//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::AppState;
use super::types::{
    ErrorResponse, EvaluateRequest, InstallationCostRequest, MaintenanceCostRequest, merge_over,
};
use crate::error::ModelError;
use crate::model::cost::{InstallationCost, MaintenanceCost, installation_cost, maintenance_cost};
use crate::model::evaluate;
use crate::model::types::{Assumptions, ProjectResult};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn bad_request(e: &ModelError) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(e)))
}

/// Merges a request override over the server's value, mapping a malformed
/// override to 400 naming `field`.
fn resolve<T>(
    defaults: &T,
    patch: Option<Value>,
    field: &str,
) -> Result<T, (StatusCode, Json<ErrorResponse>)>
where
    T: Serialize + DeserializeOwned + Clone,
{
    merge_over(defaults, patch).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("invalid {field}: {e}"),
                field: field.to_string(),
            }),
        )
    })
}

/// `GET /assumptions` → 200 + the server's default `Assumptions`
pub async fn get_assumptions(State(state): State<Arc<AppState>>) -> Json<Assumptions> {
    Json(state.defaults.clone())
}

/// `POST /evaluate` → 200 + `ProjectResult`, or 400 naming the invalid field
pub async fn post_evaluate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> ApiResult<ProjectResult> {
    let assumptions = resolve(&state.defaults, req.assumptions, "assumptions")?;
    evaluate(&req.site, &assumptions)
        .map(Json)
        .map_err(|e| bad_request(&e))
}

/// `POST /costs/installation` → 200 + `InstallationCost`
pub async fn post_installation_cost(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InstallationCostRequest>,
) -> ApiResult<InstallationCost> {
    let cost = resolve(&state.defaults.cost, req.cost, "cost")?;
    installation_cost(req.capacity_mw_dc, req.grid_distance_km, &cost)
        .map(Json)
        .map_err(|e| bad_request(&e))
}

/// `POST /costs/maintenance` → 200 + `MaintenanceCost`
pub async fn post_maintenance_cost(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MaintenanceCostRequest>,
) -> ApiResult<MaintenanceCost> {
    let maintenance = resolve(&state.defaults.maintenance, req.maintenance, "maintenance")?;
    maintenance_cost(req.capacity_mw_dc, &maintenance)
        .map(Json)
        .map_err(|e| bad_request(&e))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            defaults: Assumptions::default(),
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn assumptions_returns_defaults() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/assumptions")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = read_json(resp).await;
        assert_eq!(json["lifetime_years"], 25);
        assert_eq!(json["performance_ratio"], 0.8);
    }

    #[tokio::test]
    async fn evaluate_uses_default_assumptions() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(
                "/evaluate",
                r#"{"site": {"usable_area_acres": 100.0, "sun_hours_per_day": 5.5}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = read_json(resp).await;
        assert_eq!(json["capacity_mw_dc"], 20.0);
        assert_eq!(json["cashflows"].as_array().unwrap().len(), 25);
    }

    #[tokio::test]
    async fn evaluate_invalid_site_returns_400_with_field() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(
                "/evaluate",
                r#"{"site": {"usable_area_acres": -1.0, "sun_hours_per_day": 5.5}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = read_json(resp).await;
        assert_eq!(json["field"], "site.usable_area_acres");
    }

    #[tokio::test]
    async fn evaluate_horizon_beyond_maximum_returns_400() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(
                "/evaluate",
                r#"{
                    "site": {"usable_area_acres": 100.0, "sun_hours_per_day": 5.5},
                    "assumptions": {"lifetime_years": 4000000000}
                }"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = read_json(resp).await;
        assert_eq!(json["field"], "assumptions.lifetime_years");
    }

    #[tokio::test]
    async fn malformed_override_returns_400() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(
                "/costs/maintenance",
                r#"{"capacity_mw_dc": 5.0, "maintenance": {"opex_per_kw_year": "cheap"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = read_json(resp).await;
        assert_eq!(json["field"], "maintenance");
    }

    #[tokio::test]
    async fn installation_cost_itemized() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(
                "/costs/installation",
                r#"{"capacity_mw_dc": 20.0, "grid_distance_km": 2.0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = read_json(resp).await;
        let total = json["total_usd"].as_f64().unwrap();
        assert!((total - 17_700_000.0).abs() < 1e-3);
        assert_eq!(json["breakdown"]["line_items"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn maintenance_cost_negative_capacity_returns_400() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json("/costs/maintenance", r#"{"capacity_mw_dc": -5.0}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = read_json(resp).await;
        assert_eq!(json["field"], "capacity_mw_dc");
    }
}
