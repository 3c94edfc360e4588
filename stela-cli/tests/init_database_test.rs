use anyhow::Result;
use tempfile::TempDir;

#[tokio::test]
async fn test_init_creates_database_file_in_nested_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("data").join("stela.db");
    let database_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let pool = stela_db::init_database(&database_url).await?;

    assert!(db_path.exists());

    // Schema is in place
    sqlx::query("SELECT id FROM sites").fetch_all(&pool).await?;
    sqlx::query("SELECT id FROM pages").fetch_all(&pool).await?;

    Ok(())
}

#[tokio::test]
async fn test_init_is_idempotent_on_existing_database() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("stela.db");
    let database_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let pool = stela_db::init_database(&database_url).await?;
    drop(pool);

    let _pool = stela_db::init_database(&database_url).await?;

    Ok(())
}
