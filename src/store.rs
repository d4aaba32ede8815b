//! Catalog table DDL and database bootstrap. Tables are created if missing;
//! existing tables are left as they are.

use crate::error::CatalogError;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};

const CATALOG_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        id SERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        director VARCHAR(255) NOT NULL,
        year INTEGER NOT NULL,
        plot TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS actors (
        id SERIAL PRIMARY KEY,
        first_name VARCHAR(32) NOT NULL,
        last_name VARCHAR(32) NOT NULL,
        role VARCHAR(32) NOT NULL DEFAULT 'actor',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movie_actors (
        movie_id INTEGER NOT NULL REFERENCES movies (id) ON DELETE CASCADE,
        actor_id INTEGER NOT NULL REFERENCES actors (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (movie_id, actor_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS movie_actors_actor_id_idx ON movie_actors (actor_id)",
];

/// Create `movies`, `actors` and `movie_actors` when they do not exist yet.
/// Runs in one transaction so a half-created schema is never left behind.
pub async fn ensure_catalog_tables(pool: &PgPool) -> Result<(), CatalogError> {
    let mut tx = pool.begin().await?;
    for ddl in CATALOG_DDL {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::debug!("catalog tables ensured");
    Ok(())
}

/// Ensure the database named in `opts` exists; create it if not. Connects to
/// the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(opts: &PgConnectOptions) -> Result<(), CatalogError> {
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(()),
    };
    let mut conn = opts.clone().database("postgres").connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
