//! Generic table access over a single SQLite database.
//!
//! Every table has an `id INTEGER PRIMARY KEY AUTOINCREMENT` column followed
//! by the columns its [`Table`] impl declares. Lookups that find nothing return
//! `None`; only real database failures become errors.

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::RepoError;

/// Version written to `store_meta` when a database is first opened.
pub const SCHEMA_VERSION: i64 = 1;

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// A record type stored in its own table.
pub trait Table: Sized + Send + Unpin + 'static {
    /// Table name.
    const NAME: &'static str;
    /// Entity name used in error messages.
    const ENTITY: &'static str;
    /// `(column, type)` pairs after the id column, in bind order.
    const COLUMNS: &'static [(&'static str, &'static str)];

    /// Bind every column of `COLUMNS`, in order.
    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;

    /// Map a row selected with `id` plus `COLUMNS`.
    fn from_row(row: &SqliteRow) -> Result<Self, RepoError>;
}

/// A value compared against a column in a [`Filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Conjunction of column equalities.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(&'static str, SqlValue)>,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::default().and_eq(column, value)
    }

    pub fn and_eq(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.clauses.push((column, value.into()));
        self
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            return String::new();
        }
        let conditions = self
            .clauses
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(" AND ");
        format!(" WHERE {}", conditions)
    }

    fn bind<'q>(&'q self, mut query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        for (_, value) in &self.clauses {
            query = match value {
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.as_str()),
            };
        }
        query
    }
}

/// Handle to the embedded database. Cloning shares the pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `db_path`.
    pub async fn open(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("open", e))?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database, kept alive for the lifetime of the store.
    pub async fn in_memory() -> Result<Self, RepoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| RepoError::database("open", e))?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, RepoError> {
        let store = Self { pool };
        store.ensure_meta().await?;
        Ok(store)
    }

    async fn ensure_meta(&self) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS store_meta (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("store_meta", e))?;

        sqlx::query(
            "INSERT INTO store_meta (key, value) VALUES ('schema_version', ?) ON CONFLICT(key) DO NOTHING",
        )
        .bind(SCHEMA_VERSION.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("store_meta", e))?;

        let version = self.schema_version().await?;
        if version != SCHEMA_VERSION {
            tracing::warn!(
                stored = version,
                expected = SCHEMA_VERSION,
                "Database schema version differs from this build"
            );
        }
        Ok(())
    }

    pub async fn schema_version(&self) -> Result<i64, RepoError> {
        let row = sqlx::query("SELECT value FROM store_meta WHERE key = 'schema_version'")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("schema_version", e))?;
        let Some(row) = row else {
            return Err(RepoError::not_found("store_meta", "schema_version"));
        };
        let value: String = row
            .try_get("value")
            .map_err(RepoError::serialization)?;
        value
            .parse()
            .map_err(|_| RepoError::serialization(format!("bad schema_version {:?}", value)))
    }

    /// Idempotent schema creation for `T`.
    pub async fn create_table<T: Table>(&self) -> Result<(), RepoError> {
        let columns = T::COLUMNS
            .iter()
            .map(|(name, ty)| format!("{} {}", name, ty))
            .collect::<Vec<_>>()
            .join(", ");
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {})",
            T::NAME,
            columns
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("create_table", e))?;
        Ok(())
    }

    /// Insert a row and return the id SQLite assigned.
    pub async fn insert<T: Table>(&self, record: &T) -> Result<i64, RepoError> {
        let names = column_names::<T>().join(", ");
        let placeholders = vec!["?"; T::COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::NAME,
            names,
            placeholders
        );

        let result = record
            .bind_columns(sqlx::query(&sql))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    RepoError::constraint(format!("duplicate key in {}: {}", T::NAME, db))
                }
                other => RepoError::database("insert", other),
            })?;

        Ok(result.last_insert_rowid())
    }

    /// Replace every column of row `id`.
    pub async fn update<T: Table>(&self, id: i64, record: &T) -> Result<(), RepoError> {
        let assignments = column_names::<T>()
            .iter()
            .map(|name| format!("{} = ?", name))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {} WHERE id = ?", T::NAME, assignments);

        let result = record
            .bind_columns(sqlx::query(&sql))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(T::ENTITY, id));
        }
        Ok(())
    }

    pub async fn get_by_id<T: Table>(&self, id: i64) -> Result<Option<T>, RepoError> {
        let sql = format!("{} WHERE id = ?", select_sql::<T>());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_by_id", e))?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// First row (lowest id) matching `filter`.
    pub async fn get_by<T: Table>(&self, filter: &Filter) -> Result<Option<T>, RepoError> {
        let sql = format!(
            "{}{} ORDER BY id LIMIT 1",
            select_sql::<T>(),
            filter.where_clause()
        );
        let row = filter
            .bind(sqlx::query(&sql))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_by", e))?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Every row matching `filter`, in id order.
    pub async fn get_all_by<T: Table>(&self, filter: &Filter) -> Result<Vec<T>, RepoError> {
        let sql = format!("{}{} ORDER BY id", select_sql::<T>(), filter.where_clause());
        let rows = filter
            .bind(sqlx::query(&sql))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_all_by", e))?;
        rows.iter().map(T::from_row).collect()
    }

    pub async fn get_all<T: Table>(&self) -> Result<Vec<T>, RepoError> {
        self.get_all_by(&Filter::default()).await
    }

    /// A single text column of every row, in id order.
    pub async fn column_values<T: Table>(&self, column: &'static str) -> Result<Vec<String>, RepoError> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", column, T::NAME);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("column_values", e))?;
        rows.iter()
            .map(|row| row.try_get::<String, _>(column).map_err(RepoError::serialization))
            .collect()
    }

    pub async fn is_table_empty<T: Table>(&self) -> Result<bool, RepoError> {
        Ok(self.count::<T>().await? == 0)
    }

    pub async fn exists<T: Table>(&self, id: i64) -> Result<bool, RepoError> {
        let sql = format!("SELECT COUNT(*) AS n FROM {} WHERE id = ?", T::NAME);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("exists", e))?;
        let n: i64 = row.try_get("n").map_err(RepoError::serialization)?;
        Ok(n > 0)
    }

    pub async fn count<T: Table>(&self) -> Result<i64, RepoError> {
        let sql = format!("SELECT COUNT(*) AS n FROM {}", T::NAME);
        let row = sqlx::query(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("count", e))?;
        row.try_get("n").map_err(RepoError::serialization)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    #[cfg(test)]
    pub(crate) fn pool_for_tests(&self) -> &SqlitePool {
        &self.pool
    }
}

fn column_names<T: Table>() -> Vec<&'static str> {
    T::COLUMNS.iter().map(|(name, _)| *name).collect()
}

fn select_sql<T: Table>() -> String {
    format!("SELECT id, {} FROM {}", column_names::<T>().join(", "), T::NAME)
}
