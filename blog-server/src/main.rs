use std::sync::Arc;

use anyhow::Context;
use blog_server::application::post_service::PostService;
use blog_server::data::post_repository::PostgresPostRepository;
use blog_server::infrastructure::clock::SystemClock;
use blog_server::infrastructure::config::AppConfig;
use blog_server::infrastructure::database::{create_pool, run_migrations};
use blog_server::infrastructure::logging::init_logging;
use blog_server::server::start_rest_server;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().inspect_err(|err| {
        error!(error = %err, "invalid configuration");
    })?;
    let pool = create_pool(&config)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));
    let post_service = PostService::new(post_repo, Arc::new(SystemClock));

    let served = start_rest_server(&config, post_service).await;

    pool.close().await;
    info!("database pool closed");

    served.context("HTTP server failed")
}
