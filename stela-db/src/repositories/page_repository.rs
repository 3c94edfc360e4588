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
use stela_core::{Page, PageState};

/// Read side of the page store. Writes go through the URL rewriter so
/// that every commit passes the rewrite policy.
pub struct PageRepository {
    pool: SqlitePool,
}

// id, site_id, parent_page_id, title, url, state, position, created_at, updated_at
type PageRow = (
    i64,
    i64,
    Option<i64>,
    String,
    Option<String>,
    String,
    i32,
    String,
    String,
);

fn page_from_row(row: PageRow) -> Result<Page> {
    let (id, site_id, parent_page_id, title, url, state, position, created_at, updated_at) = row;

    Ok(Page {
        id: Some(id),
        site_id,
        parent_page_id,
        title,
        url,
        state: PageState::parse(&state).map_err(|e| anyhow!(e))?,
        position,
        created_at: parse_sqlite_datetime(&created_at)?,
        updated_at: parse_sqlite_datetime(&updated_at)?,
    })
}

impl PageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Page>> {
        let row = sqlx::query_as::<_, PageRow>(
            r#"
            SELECT id, site_id, parent_page_id, title, url, state, position, created_at, updated_at
            FROM pages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find page by id")?;

        row.map(page_from_row).transpose()
    }

    pub async fn find_by_url(&self, site_id: i64, url: &str) -> Result<Option<Page>> {
        let row = sqlx::query_as::<_, PageRow>(
            r#"
            SELECT id, site_id, parent_page_id, title, url, state, position, created_at, updated_at
            FROM pages
            WHERE site_id = ? AND url = ?
            "#,
        )
        .bind(site_id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find page by url")?;

        row.map(page_from_row).transpose()
    }

    /// Check whether a URL is taken by a committed page of the site,
    /// excluding the page being saved itself.
    pub async fn exists_by_url(
        &self,
        site_id: i64,
        url: &str,
        exclude_page_id: Option<i64>,
    ) -> Result<bool> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT 1
            FROM pages
            WHERE site_id = ? AND url = ? AND (? IS NULL OR id != ?)
            LIMIT 1
            "#,
        )
        .bind(site_id)
        .bind(url)
        .bind(exclude_page_id)
        .bind(exclude_page_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to check url existence")?;

        Ok(row.is_some())
    }

    pub async fn get_root_page(&self, site_id: i64) -> Result<Option<Page>> {
        let row = sqlx::query_as::<_, PageRow>(
            r#"
            SELECT id, site_id, parent_page_id, title, url, state, position, created_at, updated_at
            FROM pages
            WHERE site_id = ? AND parent_page_id IS NULL
            "#,
        )
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find root page")?;

        row.map(page_from_row).transpose()
    }

    pub async fn list_by_site_id(&self, site_id: i64) -> Result<Vec<Page>> {
        let rows = sqlx::query_as::<_, PageRow>(
            r#"
            SELECT id, site_id, parent_page_id, title, url, state, position, created_at, updated_at
            FROM pages
            WHERE site_id = ?
            ORDER BY parent_page_id, position, url
            "#,
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list pages by site_id")?;

        rows.into_iter().map(page_from_row).collect()
    }

    pub async fn list_children(&self, parent_page_id: i64) -> Result<Vec<Page>> {
        let rows = sqlx::query_as::<_, PageRow>(
            r#"
            SELECT id, site_id, parent_page_id, title, url, state, position, created_at, updated_at
            FROM pages
            WHERE parent_page_id = ?
            ORDER BY position, url
            "#,
        )
        .bind(parent_page_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list children pages")?;

        rows.into_iter().map(page_from_row).collect()
    }

    /// Delete a page. Its URL is free for reuse as soon as the commit
    /// lands.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let page = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("Page with id {} not found", id))?;

        if page.parent_page_id.is_none() {
            return Err(anyhow!("Cannot delete root page"));
        }

        let children = self.list_children(id).await?;
        if !children.is_empty() {
            return Err(anyhow!(
                "Cannot delete page with id {} because it has {} child page(s)",
                id,
                children.len()
            ));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start transaction")?;

        sqlx::query("DELETE FROM pages WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete page")?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(())
    }
}
