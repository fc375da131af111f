#![allow(dead_code)]

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

pub async fn run_script(pool: &SqlitePool, script: &str) {
    sqlx::raw_sql(script)
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to run script: {e}\n{script}"));
}

/// Returns the stored SQL of every catalog object, ordered by name.
pub async fn catalog(pool: &SqlitePool) -> Vec<(String, String)> {
    sqlx::query_as("SELECT name, sql FROM sqlite_master WHERE sql IS NOT NULL ORDER BY name")
        .fetch_all(pool)
        .await
        .expect("Failed to read sqlite_master")
}

pub async fn column_names(pool: &SqlitePool, table: &str) -> Vec<String> {
    sqlx::query_as::<_, (String,)>(&format!("SELECT name FROM pragma_table_info('{table}')"))
        .fetch_all(pool)
        .await
        .expect("Failed to read table info")
        .into_iter()
        .map(|(name,)| name)
        .collect()
}
