//! PostgreSQL document storage with connection pooling

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use crate::domain::DomainError;
use crate::domain::storage::{DocumentFilter, Storage, StorageEntity, StorageKey};

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/phonebook".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }
}

/// PostgreSQL document storage
///
/// Stores entities as JSONB in a table with (key, data, created_at, updated_at)
/// columns. The entity's indexed fields get expression indexes on the document.
pub struct PostgresStorage<E>
where
    E: StorageEntity,
{
    pool: PgPool,
    table_name: String,
    _phantom: PhantomData<E>,
}

impl<E> Debug for PostgresStorage<E>
where
    E: StorageEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<E> PostgresStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new PostgreSQL storage with the given pool and table name
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
            _phantom: PhantomData,
        }
    }

    /// Creates a new PostgreSQL storage with connection pooling
    pub async fn connect(
        config: &PostgresConfig,
        table_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool, table_name))
    }

    /// Ensures the storage table and the field indexes exist
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key VARCHAR(255) PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        for field in E::INDEXED_FIELDS {
            let index = format!(
                "CREATE INDEX IF NOT EXISTS {table}_{field}_idx ON {table} (({column}))",
                table = self.table_name,
                field = field,
                column = json_field(field)?,
            );

            sqlx::query(&index)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create index: {}", e)))?;
        }

        Ok(())
    }
}

fn decode_rows<E: StorageEntity>(rows: Vec<PgRow>) -> Result<Vec<E>, DomainError> {
    let mut entities = Vec::with_capacity(rows.len());

    for row in rows {
        let data: serde_json::Value = row.get("data");
        let entity: E = serde_json::from_value(data).map_err(|e| {
            DomainError::storage(format!("Failed to deserialize entity: {}", e))
        })?;
        entities.push(entity);
    }

    Ok(entities)
}

/// Text accessor for a top-level document field
fn json_field(field: &str) -> Result<String, DomainError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(DomainError::storage(format!(
            "Invalid document field name '{}'",
            field
        )));
    }

    Ok(format!("data->>'{}'", field))
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Translate a filter into a SQL predicate, pushing bind values in order
fn filter_sql(filter: &DocumentFilter, params: &mut Vec<String>) -> Result<String, DomainError> {
    match filter {
        DocumentFilter::Eq { field, value } => {
            params.push(value.clone());
            Ok(format!("{} = ${}", json_field(field)?, params.len()))
        }
        DocumentFilter::ContainsIgnoreCase { field, value } => {
            params.push(format!("%{}%", escape_like(value)));
            Ok(format!("{} ILIKE ${}", json_field(field)?, params.len()))
        }
        DocumentFilter::Or(filters) if filters.is_empty() => Ok("FALSE".to_string()),
        DocumentFilter::Or(filters) => {
            let parts = filters
                .iter()
                .map(|f| filter_sql(f, params))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", parts.join(" OR ")))
        }
    }
}

#[async_trait]
impl<E> Storage<E> for PostgresStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE key = $1", self.table_name);

        let row = sqlx::query(&query)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get entity: {}", e)))?;

        Ok(decode_rows(row.into_iter().collect())?.pop())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let query = format!(
            "SELECT data FROM {} ORDER BY created_at DESC",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list entities: {}", e)))?;

        decode_rows(rows)
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<E>, DomainError> {
        let mut params = Vec::new();
        let predicate = filter_sql(filter, &mut params)?;
        let query = format!(
            "SELECT data FROM {} WHERE {} ORDER BY created_at DESC",
            self.table_name, predicate
        );

        let mut statement = sqlx::query(&query);

        for param in params {
            statement = statement.bind(param);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query entities: {}", e)))?;

        decode_rows(rows)
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = serde_json::to_value(&entity).map_err(|e| {
            DomainError::storage(format!("Failed to serialize entity: {}", e))
        })?;

        let query = format!(
            "INSERT INTO {} (key, data) VALUES ($1, $2)",
            self.table_name
        );

        sqlx::query(&query)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("duplicate key") {
                    DomainError::conflict(format!("Entity with key '{}' already exists", key))
                } else {
                    DomainError::storage(format!("Failed to create entity: {}", e))
                }
            })?;

        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = serde_json::to_value(&entity).map_err(|e| {
            DomainError::storage(format!("Failed to serialize entity: {}", e))
        })?;

        let query = format!(
            "UPDATE {} SET data = $2, updated_at = NOW() WHERE key = $1",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update entity: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE key = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete entity: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let query = format!("DELETE FROM {}", self.table_name);

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear storage: {}", e)))?;

        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let query = format!("SELECT COUNT(*) AS count FROM {}", self.table_name);

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count entities: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE key = $1) AS exists",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check existence: {}", e)))?;

        Ok(row.get("exists"))
    }
}
