//! Database Test Utilities
//!
//! Starts a disposable PostgreSQL container per test and applies the
//! workspace migrations. Requires a running Docker daemon; tests using it are
//! marked `#[ignore]`.

use std::time::Duration;

use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimRepository};
use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "claims";
const POSTGRES_PASSWORD: &str = "claims";
const POSTGRES_DB: &str = "claims_test";

/// Postgres logs "ready" once during init and again after its restart
const CONNECT_ATTEMPTS: u32 = 10;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Connection settings of a test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A migrated PostgreSQL container that lives as long as this value
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a container and applies migrations
    pub async fn start() -> Result<Self, BoxError> {
        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let config = TestDatabaseConfig {
            host: container.get_host().await?.to_string(),
            port: container.get_host_port_ipv4(5432).await?,
            ..TestDatabaseConfig::default()
        };

        let pool = connect_with_retry(&config.connection_url()).await?;
        run_migrations(&pool).await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns a claims repository over this database
    pub fn claim_repository(&self) -> PostgresClaimRepository {
        PostgresClaimRepository::new(self.pool.clone())
    }

    /// Removes every stored claim, keeping the schema
    pub async fn clear_data(&self) -> Result<(), BoxError> {
        sqlx::query("TRUNCATE TABLE claims").execute(&self.pool).await?;
        Ok(())
    }
}

async fn connect_with_retry(url: &str) -> Result<PgPool, BoxError> {
    let config = DatabaseConfig::new(url)
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5));

    let mut attempt = 1;
    loop {
        match create_pool(config.clone()).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt >= CONNECT_ATTEMPTS => return Err(e.into()),
            Err(_) => {
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }
}

/// Creates an isolated test database for a single test
pub async fn create_isolated_test_database() -> Result<TestDatabase, BoxError> {
    TestDatabase::start().await
}
