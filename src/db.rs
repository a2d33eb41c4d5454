use sqlx::SqlitePool;
use tracing::info;

/// Connect to the data store and bring its schema up to date.
pub async fn create_db_pool(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePool::connect(db_url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database migrations applied");

    Ok(pool)
}
