use iatex_pricing::db::ensure_schema;
use iatex_pricing::service::{spawn_sweeper, CacheService, TtlCache};
use iatex_pricing::{api, create_pool, AppConfig, PricingCalculator, TemplateService};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    ensure_schema(&pool).await?;
    info!("Database pool created");

    // 看板缓存 + 定期清理
    let cache: Arc<dyn CacheService> = Arc::new(TtlCache::new());
    let sweeper = spawn_sweeper(cache.clone(), config.cache.sweep_interval());

    let calculator = Arc::new(PricingCalculator::new(config.pricing.clone()));
    let templates = Arc::new(TemplateService::new(
        pool,
        cache,
        config.cache.dashboard_ttl(),
    ));

    let app = api::pricing_routes(calculator)
        .merge(api::template_routes(templates))
        .layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/pricing/calculate         - 尺码成本/毛利/建议价");
    info!("  POST /api/pricing/margin            - 毛利率/售价联动编辑");
    info!("  GET  /api/pricing/suggestions       - 渠道建议价");
    info!("  POST /api/pricing/templates         - 保存定价模板");
    info!("  GET  /api/pricing/templates/:id/csv - 导出尺码表");
    info!("  GET  /api/dashboard/pricing         - 看板汇总 (缓存)");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    sweeper.abort();
    Ok(())
}
