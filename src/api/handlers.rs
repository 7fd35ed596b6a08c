use crate::error::PricingError;
use crate::models::{
    DashboardSummary, MarginField, PriceSuggestion, PricingInputs, PricingState, PricingTemplate,
    SizeMargin, TemplateListItem,
};
use crate::service::{compute_suggestions, export, PricingCalculator, TemplateService};
use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 通用响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let status = match &self {
            PricingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PricingError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!("请求处理失败: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ApiResponse {
            success: false,
            message: self.to_string(),
            id: None,
        };
        (status, Json(body)).into_response()
    }
}

/// 毛利编辑请求：当前尺码表 + 一次编辑
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginEditRequest {
    pub size_margins: Vec<SizeMargin>,
    pub size: String,
    pub field: MarginField,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionQuery {
    pub average_cost: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub form_data: serde_json::Map<String, serde_json::Value>,
    pub state: PricingState,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 重算尺码成本、平均值和渠道建议价
pub async fn calculate(
    State(calculator): State<Arc<PricingCalculator>>,
    Json(inputs): Json<PricingInputs>,
) -> Result<Json<PricingState>, PricingError> {
    let state = calculator.recompute(&inputs)?;
    Ok(Json(state))
}

/// 编辑毛利率或售价
pub async fn edit_margin(Json(req): Json<MarginEditRequest>) -> Result<Json<PricingState>, PricingError> {
    let mut state = PricingState::from_size_margins(req.size_margins)?;
    state.apply_edit(&req.size, req.field, req.value)?;
    Ok(Json(state))
}

pub async fn suggestions(
    Query(q): Query<SuggestionQuery>,
) -> Result<Json<Vec<PriceSuggestion>>, PricingError> {
    if !q.average_cost.is_finite() || q.average_cost < 0.0 {
        return Err(PricingError::validation("averageCost must be a non-negative number"));
    }
    Ok(Json(compute_suggestions(q.average_cost)))
}

/// 保存定价模板
pub async fn save_template(
    State(service): State<Arc<TemplateService>>,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<Response, PricingError> {
    let id = service.save(&req.name, req.form_data, &req.state).await?;
    let response = ApiResponse {
        success: true,
        message: format!("Template {} saved", req.name.trim()),
        id: Some(id),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

pub async fn list_templates(
    State(service): State<Arc<TemplateService>>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<TemplateListItem>>, PricingError> {
    Ok(Json(service.list(q.limit.unwrap_or(50)).await?))
}

pub async fn get_template(
    State(service): State<Arc<TemplateService>>,
    Path(id): Path<i64>,
) -> Result<Json<PricingTemplate>, PricingError> {
    let record = service.get(id).await?;
    Ok(Json(record.snapshot.0))
}

/// 导出模板尺码表 CSV
pub async fn template_csv(
    State(service): State<Arc<TemplateService>>,
    Path(id): Path<i64>,
) -> Result<Response, PricingError> {
    let record = service.get(id).await?;
    let mut buf = Vec::new();
    export::write_size_table_csv(&mut buf, &record.snapshot.size_margins)?;

    let disposition = format!("attachment; filename=\"pricing-template-{}.csv\"", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buf,
    )
        .into_response())
}

pub async fn dashboard_summary(
    State(service): State<Arc<TemplateService>>,
) -> Result<Json<DashboardSummary>, PricingError> {
    Ok(Json(service.dashboard_summary().await?))
}
