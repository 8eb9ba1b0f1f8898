//! Persistence gateway for the health records service
//!
//! The gateway owns the database configuration and establishes the backend
//! connection lazily, the first time a repository operation needs it. Supported
//! backends:
//! - MongoDB (default)
//! - SQLite, storing each record as a JSON document (optional `sqlite` feature)
//! - An in-process memory store for tests and local runs

use std::env;
use std::str::FromStr;
#[cfg(feature = "sqlite")]
use std::sync::Arc;
use std::time::Duration;

use mongodb::{bson::doc, options::ClientOptions, Client};
use tokio::sync::OnceCell;
use tracing::{error, info};

use super::migrations;
use super::DatabaseError;
use crate::repository::InMemoryStorage;

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// MongoDB document database
    MongoDb,
    /// SQLite database holding JSON documents
    #[cfg(feature = "sqlite")]
    Sqlite,
    /// Process-local store, lost on restart
    Memory,
}

impl FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(DatabaseType::MongoDb),
            #[cfg(feature = "sqlite")]
            "sqlite" => Ok(DatabaseType::Sqlite),
            "memory" | "in-memory" => Ok(DatabaseType::Memory),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Live handle to the selected backend. Cloning is cheap.
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// MongoDB database handle; the driver pools connections internally
    MongoDb(mongodb::Database),

    /// SQLite connection pool
    #[cfg(feature = "sqlite")]
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),

    /// In-memory document store
    Memory(InMemoryStorage),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database type (mongodb, sqlite, memory)
    pub db_type: DatabaseType,
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// MongoDB database name
    pub database_name: String,
    /// Path to SQLite database file, or `:memory:`
    pub sqlite_path: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connect and server selection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::MongoDb,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "health_records".to_string(),
            sqlite_path: "data/health_records.db".to_string(),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = DatabaseConfig::default();

        // Get database type from environment or default to MongoDB
        let db_type_str = env::var("DB_TYPE").unwrap_or_else(|_| "mongodb".to_string());
        let db_type = db_type_str.parse::<DatabaseType>()?;

        let mongodb_uri = env::var("MONGODB_URI").unwrap_or(defaults.mongodb_uri);
        let database_name = env::var("MONGODB_DATABASE").unwrap_or(defaults.database_name);
        let sqlite_path = env::var("DB_SQLITE_PATH").unwrap_or(defaults.sqlite_path);

        if database_name.trim().is_empty() {
            return Err(DatabaseError::ConfigError("MONGODB_DATABASE must not be empty".to_string()));
        }

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.max_connections);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);

        match db_type {
            DatabaseType::MongoDb => info!("Using MongoDB database '{}'", database_name),
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => info!("Using SQLite database at: {}", sqlite_path),
            DatabaseType::Memory => info!("Using in-memory storage; records are lost on restart"),
        }

        info!("Database configuration: max_connections={}, timeout={}s",
            max_connections, timeout_seconds);

        Ok(DatabaseConfig {
            db_type,
            mongodb_uri,
            database_name,
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }

    /// Configuration for the process-local store
    pub fn in_memory() -> Self {
        Self {
            db_type: DatabaseType::Memory,
            ..Self::default()
        }
    }
}

/// Lazily-established, shared connection to the document store.
///
/// `ensure_connected` is called at the start of every repository operation.
/// The first successful call connects and runs migrations; later calls return
/// the cached handle. A failed attempt is not cached, so the next request
/// tries again.
#[derive(Debug)]
pub struct DatabaseGateway {
    config: DatabaseConfig,
    pool: OnceCell<DatabasePool>,
}

impl DatabaseGateway {
    /// Create a gateway; no connection is made until first use
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    /// Create a gateway configured from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseConfig::from_env()?))
    }

    /// Configuration the gateway connects with
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Whether a connection has been established yet
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    /// Return the live backend handle, connecting first if needed
    pub async fn ensure_connected(&self) -> Result<DatabasePool, DatabaseError> {
        self.pool
            .get_or_try_init(|| connect(&self.config))
            .await
            .cloned()
    }

    /// Round-trip to the backend to verify it is reachable
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        match self.ensure_connected().await? {
            DatabasePool::MongoDb(db) => {
                db.run_command(doc! { "ping": 1 }, None).await?;
                Ok(())
            }
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            }
            DatabasePool::Memory(_) => Ok(()),
        }
    }

    /// Describe the current connection, or `None` before the first connect
    pub fn connection_info(&self) -> Option<String> {
        let pool = self.pool.get()?;

        let info = match pool {
            DatabasePool::MongoDb(db) => format!("MongoDB database '{}'", db.name()),
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let state = pool.state();
                format!("SQLite database at {} (connections: active={}, idle={})",
                    self.config.sqlite_path,
                    state.connections,
                    state.idle_connections
                )
            }
            DatabasePool::Memory(storage) => {
                format!("In-memory storage ({} records)", storage.len())
            }
        };

        Some(info)
    }
}

/// Connect to the configured backend and run its migrations
async fn connect(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing database connection with type: {:?}", config.db_type);

    let pool = match config.db_type {
        DatabaseType::MongoDb => initialize_mongodb_pool(config).await?,
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => initialize_sqlite_pool(config)?,
        DatabaseType::Memory => DatabasePool::Memory(InMemoryStorage::new()),
    };

    run_migrations(&pool).await?;

    info!("Database connection established");
    Ok(pool)
}

/// Initialize the MongoDB client and verify the server answers
async fn initialize_mongodb_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let mut options = ClientOptions::parse(&config.mongodb_uri).await.map_err(|e| {
        error!("Invalid MongoDB connection string: {}", e);
        DatabaseError::ConfigError(format!("Invalid MongoDB connection string: {}", e))
    })?;

    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.max_pool_size = Some(config.max_connections);
    options.connect_timeout = Some(Duration::from_secs(config.timeout_seconds));
    options.server_selection_timeout = Some(Duration::from_secs(config.timeout_seconds));

    let client = Client::with_options(options)?;
    let db = client.database(&config.database_name);

    db.run_command(doc! { "ping": 1 }, None).await.map_err(|e| {
        error!("Failed to connect to MongoDB: {}", e);
        DatabaseError::MongoError(e)
    })?;

    info!(database = %config.database_name, "Connected to MongoDB");
    Ok(DatabasePool::MongoDb(db))
}

/// Initialize SQLite connection pool
#[cfg(feature = "sqlite")]
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    let sqlite_path = config.sqlite_path.as_str();

    // Every connection to ":memory:" opens a separate database, so the pool
    // must hold exactly one
    let (manager, max_size) = if sqlite_path == ":memory:" {
        info!("Initializing in-memory SQLite database");
        (r2d2_sqlite::SqliteConnectionManager::memory(), 1)
    } else {
        info!("Initializing SQLite database at: {}", sqlite_path);

        if let Some(parent) = Path::new(sqlite_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::ConfigError(format!("Failed to create directory {:?}: {}", parent, e))
                })?;
            }
        }

        let manager = r2d2_sqlite::SqliteConnectionManager::file(sqlite_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);
        (manager, config.max_connections)
    };

    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)
        .map_err(|e| {
            error!("Failed to create SQLite connection pool: {}", e);
            DatabaseError::SqlitePoolError(e)
        })?;

    info!("SQLite connection pool created successfully");
    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Run the backend's migrations
async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    match pool {
        DatabasePool::MongoDb(db) => {
            migrations::run_mongodb_migrations(db)
                .await
                .map_err(DatabaseError::MigrationError)?;
        }
        #[cfg(feature = "sqlite")]
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            migrations::run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;
        }
        DatabasePool::Memory(_) => {}
    }

    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.db_type, DatabaseType::MongoDb);
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "health_records");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_database_type_from_str() {
        assert_eq!("mongodb".parse::<DatabaseType>().unwrap(), DatabaseType::MongoDb);
        assert_eq!("MONGO".parse::<DatabaseType>().unwrap(), DatabaseType::MongoDb);
        assert_eq!("memory".parse::<DatabaseType>().unwrap(), DatabaseType::Memory);

        #[cfg(feature = "sqlite")]
        assert_eq!("sqlite".parse::<DatabaseType>().unwrap(), DatabaseType::Sqlite);

        assert!("unknown".parse::<DatabaseType>().is_err());
    }

    #[tokio::test]
    async fn test_gateway_connects_lazily_and_reuses_pool() {
        let gateway = DatabaseGateway::new(DatabaseConfig::in_memory());
        assert!(!gateway.is_connected());
        assert!(gateway.connection_info().is_none());

        let first = gateway.ensure_connected().await.unwrap();
        let second = gateway.ensure_connected().await.unwrap();
        assert!(gateway.is_connected());

        // Both handles point at the same store
        match (first, second) {
            (DatabasePool::Memory(a), DatabasePool::Memory(b)) => assert!(a.shares_storage_with(&b)),
            other => panic!("unexpected pools: {:?}", other),
        }

        gateway.ping().await.unwrap();
        assert!(gateway.connection_info().unwrap().contains("In-memory"));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_gateway_sqlite_in_memory() {
        let config = DatabaseConfig {
            db_type: DatabaseType::Sqlite,
            sqlite_path: ":memory:".to_string(),
            ..DatabaseConfig::default()
        };
        let gateway = DatabaseGateway::new(config);

        gateway.ping().await.unwrap();
        assert!(gateway.connection_info().unwrap().starts_with("SQLite database at :memory:"));
    }

    #[tokio::test]
    async fn test_failed_connect_is_not_cached() {
        let config = DatabaseConfig {
            mongodb_uri: "not-a-connection-string".to_string(),
            ..DatabaseConfig::default()
        };
        let gateway = DatabaseGateway::new(config);

        assert!(matches!(
            gateway.ensure_connected().await,
            Err(DatabaseError::ConfigError(_))
        ));
        assert!(!gateway.is_connected());
        assert!(gateway.ensure_connected().await.is_err());
    }
}
