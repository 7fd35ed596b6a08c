use super::{Averages, PriceSuggestion, SizeMargin};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 定价模板快照 `{...formData, sizeMargins, averages, createdAt}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTemplate {
    /// 向导表单数据，原样保存
    #[serde(flatten)]
    pub form_data: serde_json::Map<String, serde_json::Value>,
    pub size_margins: Vec<SizeMargin>,
    pub averages: Averages,
    #[serde(default)]
    pub suggestions: Vec<PriceSuggestion>,
    pub created_at: DateTime<Utc>,
}

/// pricing_templates 表行
#[derive(Debug, Clone, FromRow)]
pub struct TemplateRecord {
    pub id: i64,
    pub name: String,
    pub snapshot: sqlx::types::Json<PricingTemplate>,
    pub average_cost: BigDecimal,
    pub average_final_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// 模板列表项（不含快照）
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListItem {
    pub id: i64,
    pub name: String,
    pub average_cost: BigDecimal,
    pub average_final_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// 看板汇总
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub template_count: i64,
    pub average_cost: BigDecimal,
    pub average_final_price: BigDecimal,
    pub latest_created_at: Option<DateTime<Utc>>,
}
