use product_catalog::db::{create_pool, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();
    let database_url = std::env::var("DATABASE_URL")?;
    let pool = create_pool(&database_url, 2).await?;
    run_migrations(&pool).await?;
    tracing::info!("migrations applied");
    Ok(())
}
