use crate::models::{DashboardSummary, PricingTemplate, TemplateListItem, TemplateRecord};
use bigdecimal::BigDecimal;
use sqlx::types::Json;
use sqlx::PgPool;

/// 插入定价模板快照，返回新ID
pub async fn insert_template(
    pool: &PgPool,
    name: &str,
    snapshot: &PricingTemplate,
    average_cost: BigDecimal,
    average_final_price: BigDecimal,
) -> Result<i64, sqlx::Error> {
    let start_time = std::time::Instant::now();

    let execute_result = tokio::time::timeout(
        std::time::Duration::from_secs(30),
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO pricing_templates (name, snapshot, average_cost, average_final_price, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(Json(snapshot))
        .bind(average_cost)
        .bind(average_final_price)
        .bind(snapshot.created_at)
        .fetch_one(pool),
    )
    .await;

    match execute_result {
        Ok(Ok(id)) => {
            tracing::info!("✓ 模板 {} 保存成功, id={}, 耗时: {:?}", name, id, start_time.elapsed());
            Ok(id)
        }
        Ok(Err(e)) => {
            tracing::error!("✗ 模板 {} 保存失败, 耗时: {:?}, 错误: {:?}", name, start_time.elapsed(), e);
            Err(e)
        }
        Err(_) => {
            tracing::error!("✗ 模板 {} 保存超时 (>30秒)!", name);
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}

/// 按ID查询模板
pub async fn get_template(pool: &PgPool, id: i64) -> Result<Option<TemplateRecord>, sqlx::Error> {
    sqlx::query_as::<_, TemplateRecord>(
        r#"
        SELECT id, name, snapshot, average_cost, average_final_price, created_at
        FROM pricing_templates
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// 最近的模板 (按创建时间倒序)
pub async fn list_templates(pool: &PgPool, limit: i64) -> Result<Vec<TemplateListItem>, sqlx::Error> {
    sqlx::query_as::<_, TemplateListItem>(
        r#"
        SELECT id, name, average_cost, average_final_price, created_at
        FROM pricing_templates
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// 看板汇总统计
pub async fn template_summary(pool: &PgPool) -> Result<DashboardSummary, sqlx::Error> {
    sqlx::query_as::<_, DashboardSummary>(
        r#"
        SELECT count(*) as template_count,
               coalesce(round(avg(average_cost), 2), 0) as average_cost,
               coalesce(round(avg(average_final_price), 2), 0) as average_final_price,
               max(created_at) as latest_created_at
        FROM pricing_templates
        "#,
    )
    .fetch_one(pool)
    .await
}
