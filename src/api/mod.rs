pub mod handlers;

pub use handlers::*;

use crate::service::{PricingCalculator, TemplateService};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 计算类路由（无需数据库）
pub fn pricing_routes(calculator: Arc<PricingCalculator>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/pricing/calculate", post(calculate))
        .route("/api/pricing/margin", post(edit_margin))
        .route("/api/pricing/suggestions", get(suggestions))
        .with_state(calculator)
}

/// 模板与看板路由
pub fn template_routes(service: Arc<TemplateService>) -> Router {
    Router::new()
        .route("/api/pricing/templates", post(save_template).get(list_templates))
        .route("/api/pricing/templates/:id", get(get_template))
        .route("/api/pricing/templates/:id/csv", get(template_csv))
        .route("/api/dashboard/pricing", get(dashboard_summary))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricingState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        pricing_routes(Arc::new(PricingCalculator::default()))
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health() {
        let resp = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn calculate_returns_state() {
        let body = json!({
            "sizes": [
                {"size": "P", "quantity": 1, "weightGrams": 200},
                {"size": "M", "quantity": 1, "weightGrams": 220}
            ],
            "fabric": {"pricePerKg": 50},
            "wastePercentage": 10
        });
        let resp = app().oneshot(post_json("/api/pricing/calculate", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let state: PricingState = serde_json::from_value(body_json(resp).await).unwrap();
        assert_eq!(state.size_margins.len(), 2);
        assert!((state.size_margins[0].final_price - 13.2).abs() < 1e-9);
        assert!((state.size_margins[1].final_price - 14.52).abs() < 1e-9);
        assert_eq!(state.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn calculate_without_pieces_is_unprocessable() {
        let body = json!({"sizes": [{"size": "P", "quantity": 0}]});
        let resp = app().oneshot(post_json("/api/pricing/calculate", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let v = body_json(resp).await;
        assert_eq!(v["success"], false);
        assert!(v["message"].as_str().unwrap().contains("no pieces"));
    }

    #[tokio::test]
    async fn margin_edit_round_trip() {
        let calc = PricingCalculator::default();
        let state = calc
            .recompute(&serde_json::from_value(json!({
                "sizes": [{"size": "P", "quantity": 2, "weightGrams": 200}],
                "fabric": {"pricePerKg": 50}
            }))
            .unwrap())
            .unwrap();

        let body = json!({
            "sizeMargins": state.size_margins,
            "size": "P",
            "field": "finalPrice",
            "value": 22.0
        });
        let resp = app().oneshot(post_json("/api/pricing/margin", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let edited: PricingState = serde_json::from_value(body_json(resp).await).unwrap();
        assert!((edited.size_margins[0].margin_percent - 100.0).abs() < 1e-9);
        assert!((edited.averages.final_price - 22.0).abs() < 1e-9);

        let body = json!({
            "sizeMargins": state.size_margins,
            "size": "P",
            "field": "marginPercent",
            "value": -5.0
        });
        let resp = app().oneshot(post_json("/api/pricing/margin", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn margin_edit_rejects_inconsistent_rows() {
        let calc = PricingCalculator::default();
        let state = calc
            .recompute(&serde_json::from_value(json!({
                "sizes": [
                    {"size": "P", "quantity": 1, "weightGrams": 200},
                    {"size": "M", "quantity": 1, "weightGrams": 220}
                ],
                "fabric": {"pricePerKg": 50}
            }))
            .unwrap())
            .unwrap();

        let mut rows = serde_json::to_value(&state.size_margins).unwrap();
        rows[1]["cost"] = json!(-999.0);
        rows[1]["profitValue"] = json!(7.0);
        rows[1]["finalPrice"] = json!(1.0);
        rows[1]["marginPercent"] = json!(-50.0);

        let body = json!({
            "sizeMargins": rows,
            "size": "P",
            "field": "marginPercent",
            "value": 30.0
        });
        let resp = app().oneshot(post_json("/api/pricing/margin", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let v = body_json(resp).await;
        assert_eq!(v["success"], false);
        assert!(v["message"].as_str().unwrap().contains("size M"));
    }

    #[tokio::test]
    async fn suggestions_by_query() {
        let resp = app()
            .oneshot(
                Request::get("/api/pricing/suggestions?averageCost=20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v[2]["name"], "Varejo");
        assert!((v[1]["price"].as_f64().unwrap() - 27.0).abs() < 1e-9);
    }
}
