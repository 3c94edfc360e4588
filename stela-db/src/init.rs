use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the database, creating the file if needed and ensuring the schema
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    // Create database file directory if it doesn't exist
    if database_url.starts_with("sqlite:") {
        let path = database_url.trim_start_matches("sqlite:");
        if !path.starts_with(":memory:") {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent).context("Failed to create database directory")?;
            }
        }
    }

    // Create connection pool
    let pool = SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create tables and indexes. Safe to call on an already-initialized database.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Ensuring database schema");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await
        .context("Failed to enable foreign keys")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create sites table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            site_id INTEGER NOT NULL,
            parent_page_id INTEGER,
            title TEXT NOT NULL,
            url TEXT,
            state TEXT NOT NULL DEFAULT 'offline',
            position INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (site_id) REFERENCES sites(id),
            FOREIGN KEY (parent_page_id) REFERENCES pages(id)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create pages table")?;

    // The storage layer is the source of truth for URL unicity; the
    // rewriter treats violations on derived URLs as lost races.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_pages_site_url
        ON pages(site_id, url)
        WHERE url IS NOT NULL AND url <> ''
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create page url index")?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_pages_parent
        ON pages(parent_page_id)
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create page parent index")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_database_in_memory() -> Result<()> {
        let pool = init_database("sqlite::memory:").await?;

        // Both tables exist and are queryable
        sqlx::query("SELECT id FROM sites").fetch_all(&pool).await?;
        sqlx::query("SELECT id FROM pages").fetch_all(&pool).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_schema_is_idempotent() -> Result<()> {
        let pool = init_database("sqlite::memory:").await?;
        create_schema(&pool).await?;
        create_schema(&pool).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_url_index_rejects_duplicates_but_not_empty_urls() -> Result<()> {
        let pool = init_database("sqlite::memory:").await?;

        sqlx::query("INSERT INTO sites (label) VALUES ('foobar')")
            .execute(&pool)
            .await?;

        sqlx::query("INSERT INTO pages (site_id, title, url) VALUES (1, 'a', '/a')")
            .execute(&pool)
            .await?;

        let duplicate = sqlx::query("INSERT INTO pages (site_id, title, url) VALUES (1, 'b', '/a')")
            .execute(&pool)
            .await;
        assert!(duplicate.is_err());

        // Empty and NULL URLs are not subject to the index
        for _ in 0..2 {
            sqlx::query("INSERT INTO pages (site_id, title, url) VALUES (1, 'c', '')")
                .execute(&pool)
                .await?;
            sqlx::query("INSERT INTO pages (site_id, title, url) VALUES (1, 'd', NULL)")
                .execute(&pool)
                .await?;
        }

        Ok(())
    }
}
