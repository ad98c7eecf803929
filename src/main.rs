use debit_note_service::db::{run_migrations, PgStore};
use debit_note_service::{api, create_pool, AppConfig, DebitNoteService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = AppConfig::from_env()?;

    // 初始化日志 - 本地时间格式, RUST_LOG 优先于配置
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_env_filter(filter)
        .init();

    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    if config.database.run_migrations {
        run_migrations(&pool).await?;
        info!("Migrations applied");
    }

    let service = Arc::new(DebitNoteService::new(Arc::new(PgStore::new(pool))));
    let app = api::router(service);

    // 启动服务器
    let addr = config.bind_addr();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET /health");
    info!("  PUT /api/debit-notes/:debit_id          - update a debit note");
    info!("  GET /api/debit-notes/:debit_id          - fetch a debit note");
    info!("  GET /api/debit-notes/:debit_id/journal  - trial balance rows");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
