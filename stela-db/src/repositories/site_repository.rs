// Stela - A content management core built with Rust
// Copyright (C) 2025 Stela Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::repositories::parse_sqlite_datetime;
use anyhow::{anyhow, Context, Result};
use sqlx::SqlitePool;
use stela_core::Site;

pub struct SiteRepository {
    pool: SqlitePool,
}

// id, label, created_at, updated_at
type SiteRow = (i64, String, String, String);

fn site_from_row(row: SiteRow) -> Result<Site> {
    let (id, label, created_at, updated_at) = row;

    Ok(Site {
        id: Some(id),
        label,
        created_at: parse_sqlite_datetime(&created_at)?,
        updated_at: parse_sqlite_datetime(&updated_at)?,
    })
}

impl SiteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a site together with its root page. The root holds the
    /// reserved `/` URL from the start, so it never competes with
    /// generated page URLs.
    pub async fn create(&self, site: &Site) -> Result<i64> {
        if let Err(e) = site.validate_label() {
            return Err(anyhow!(e));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO sites (label, created_at, updated_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&site.label)
        .bind(site.created_at)
        .bind(site.updated_at)
        .execute(&mut *tx)
        .await
        .context("Failed to create site")?;

        let site_id = result.last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO pages (site_id, parent_page_id, title, url, state, position, created_at, updated_at)
            VALUES (?, NULL, ?, '/', 'online', 0, ?, ?)
            "#,
        )
        .bind(site_id)
        .bind(&site.label)
        .bind(site.created_at)
        .bind(site.updated_at)
        .execute(&mut *tx)
        .await
        .context("Failed to create root page")?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(site_id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Site>> {
        let row = sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT id, label, created_at, updated_at
            FROM sites
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find site by id")?;

        row.map(site_from_row).transpose()
    }

    pub async fn find_by_label(&self, label: &str) -> Result<Option<Site>> {
        let row = sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT id, label, created_at, updated_at
            FROM sites
            WHERE label = ?
            "#,
        )
        .bind(label)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find site by label")?;

        row.map(site_from_row).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Site>> {
        let rows = sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT id, label, created_at, updated_at
            FROM sites
            ORDER BY label
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list sites")?;

        rows.into_iter().map(site_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::create_schema;
    use crate::repositories::PageRepository;

    async fn setup_test_db() -> Result<SqlitePool> {
        let pool = SqlitePool::connect(":memory:")
            .await
            .context("Failed to open in-memory database")?;
        create_schema(&pool).await?;
        Ok(pool)
    }

    #[tokio::test]
    async fn test_create_site_creates_root_page() -> Result<()> {
        let pool = setup_test_db().await?;
        let repo = SiteRepository::new(pool.clone());

        let site_id = repo.create(&Site::new("foobar".to_string())).await?;

        let site = repo.find_by_id(site_id).await?.expect("site should exist");
        assert_eq!(site.label, "foobar");

        let root = PageRepository::new(pool.clone())
            .get_root_page(site_id)
            .await?
            .expect("root page should exist");
        assert!(root.is_root());
        assert_eq!(root.title, "foobar");
        assert_eq!(root.url.as_deref(), Some("/"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_empty_label() -> Result<()> {
        let pool = setup_test_db().await?;
        let repo = SiteRepository::new(pool.clone());

        let result = repo.create(&Site::new("   ".to_string())).await;
        assert!(result.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_label() -> Result<()> {
        let pool = setup_test_db().await?;
        let repo = SiteRepository::new(pool.clone());

        repo.create(&Site::new("foobar".to_string())).await?;
        let result = repo.create(&Site::new("foobar".to_string())).await;
        assert!(result.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_label() -> Result<()> {
        let pool = setup_test_db().await?;
        let repo = SiteRepository::new(pool.clone());

        repo.create(&Site::new("foobar".to_string())).await?;

        assert!(repo.find_by_label("foobar").await?.is_some());
        assert!(repo.find_by_label("missing").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_sites_sorted_by_label() -> Result<()> {
        let pool = setup_test_db().await?;
        let repo = SiteRepository::new(pool.clone());

        repo.create(&Site::new("zulu".to_string())).await?;
        repo.create(&Site::new("alpha".to_string())).await?;

        let sites = repo.list().await?;
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].label, "alpha");
        assert_eq!(sites[1].label, "zulu");

        Ok(())
    }
}
