/// Database layer
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded schema migrations
///
/// Row-level operations live on the models; the `store` module wraps them
/// behind the persistence traits.
///
/// # Example
///
/// ```no_run
/// use todo_shared::db::{migrations::run_migrations, pool::{create_pool, PoolConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(PoolConfig::new(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
