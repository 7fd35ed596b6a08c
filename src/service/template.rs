use crate::db::queries;
use crate::error::PricingError;
use crate::models::{DashboardSummary, PricingState, PricingTemplate, TemplateListItem, TemplateRecord};
use crate::service::cache::CacheService;
use crate::service::calculator::to_money;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

const DASHBOARD_CACHE_KEY: &str = "dashboard:pricing-summary";

/// 定价模板服务：保存/读取快照，看板汇总
pub struct TemplateService {
    pool: PgPool,
    cache: Arc<dyn CacheService>,
    dashboard_ttl: Duration,
}

impl TemplateService {
    pub fn new(pool: PgPool, cache: Arc<dyn CacheService>, dashboard_ttl: Duration) -> Self {
        Self {
            pool,
            cache,
            dashboard_ttl,
        }
    }

    /// 保存快照。失败时不重试，由操作员手动重新提交。
    pub async fn save(
        &self,
        name: &str,
        form_data: serde_json::Map<String, serde_json::Value>,
        state: &PricingState,
    ) -> Result<i64, PricingError> {
        if name.trim().is_empty() {
            return Err(PricingError::validation("template name is required"));
        }
        if state.size_margins.is_empty() {
            return Err(PricingError::validation("no pieces defined"));
        }

        // 平均值与建议价以校验后的尺码行为准
        let state = PricingState::from_size_margins(state.size_margins.clone())?;
        let snapshot = build_snapshot(form_data, &state);
        let id = queries::insert_template(
            &self.pool,
            name.trim(),
            &snapshot,
            to_money(state.averages.cost),
            to_money(state.averages.final_price),
        )
        .await?;

        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<TemplateRecord, PricingError> {
        queries::get_template(&self.pool, id)
            .await?
            .ok_or(PricingError::NotFound(id))
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<TemplateListItem>, PricingError> {
        Ok(queries::list_templates(&self.pool, limit.clamp(1, 200)).await?)
    }

    /// 看板汇总，按配置 TTL 缓存
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, PricingError> {
        if let Some(cached) = self.cache.get(DASHBOARD_CACHE_KEY, self.dashboard_ttl) {
            match serde_json::from_value::<DashboardSummary>(cached) {
                Ok(summary) => return Ok(summary),
                Err(e) => tracing::warn!("看板缓存数据无法解析, 重新查询: {}", e),
            }
        }

        let summary = queries::template_summary(&self.pool).await?;
        self.cache
            .set(DASHBOARD_CACHE_KEY, serde_json::to_value(&summary)?, self.dashboard_ttl);
        Ok(summary)
    }
}

/// 组装快照 `{...formData, sizeMargins, averages, createdAt}`
///
/// 表单中与派生字段同名的键会被派生值覆盖。
pub fn build_snapshot(
    mut form_data: serde_json::Map<String, serde_json::Value>,
    state: &PricingState,
) -> PricingTemplate {
    for key in ["sizeMargins", "averages", "suggestions", "createdAt"] {
        form_data.remove(key);
    }

    PricingTemplate {
        form_data,
        size_margins: state.size_margins.clone(),
        averages: state.averages,
        suggestions: state.suggestions.clone(),
        created_at: Utc::now(),
    }
}
