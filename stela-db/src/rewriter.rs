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

use crate::repositories::PageRepository;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashSet;
use stela_core::rewrite::{decide_url_action, generate_url, PageSnapshot, RewritePolicy, UrlAction};
use stela_core::utils::unique::resolve_unique;
use stela_core::{Page, PageState};

/// Writes that retry a lost URL race before giving up.
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// The flush boundary of the page store: every save runs the rewrite
/// policy, resolves URL unicity, and writes the row inside a single
/// transaction. The entity's URL is only updated once the commit lands,
/// so in-memory state never diverges from the store on failure.
pub struct UrlRewriter {
    pool: SqlitePool,
    policy: RewritePolicy,
}

impl UrlRewriter {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            policy: RewritePolicy::default(),
        }
    }

    pub fn with_policy(pool: SqlitePool, policy: RewritePolicy) -> Self {
        Self { pool, policy }
    }

    pub fn policy(&self) -> &RewritePolicy {
        &self.policy
    }

    /// Persist the page, generating or rewriting its URL as the policy
    /// dictates. On success the page's id, url and updated_at reflect
    /// the committed row.
    pub async fn save(&self, page: &mut Page) -> Result<i64> {
        if page.id.is_none() && page.parent_page_id.is_none() {
            return Err(anyhow!(
                "Root pages are created automatically with sites and cannot be created manually"
            ));
        }

        if let Err(e) = page.validate_url() {
            return Err(anyhow!(e));
        }

        let mut attempt = 1;
        loop {
            match self.try_save(page).await {
                Ok((id, url, updated_at)) => {
                    page.id = Some(id);
                    page.url = url;
                    page.updated_at = updated_at;
                    return Ok(id);
                }
                Err(e)
                    if attempt < MAX_WRITE_ATTEMPTS
                        && self.policy.preserve_unicity
                        && is_unique_violation(&e) =>
                {
                    // A concurrent writer took the URL between the probe
                    // and the write; probe again with a fresh snapshot.
                    tracing::debug!(attempt, "lost a url race, retrying flush");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Remove the page. Its URL is free for other pages as soon as the
    /// commit lands.
    pub async fn remove(&self, page: &Page) -> Result<()> {
        let id = page
            .id
            .ok_or_else(|| anyhow!("Cannot remove page without ID"))?;

        PageRepository::new(self.pool.clone()).delete(id).await?;
        tracing::debug!(page_id = id, url = ?page.url, "page removed");

        Ok(())
    }

    async fn try_save(&self, page: &Page) -> Result<(i64, Option<String>, DateTime<Utc>)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start transaction")?;

        let persisted = match page.id {
            Some(id) => Some(load_snapshot(&mut tx, id).await?),
            None => None,
        };

        let url = match decide_url_action(persisted.as_ref(), page, &self.policy) {
            UrlAction::Keep => page.url.clone(),
            UrlAction::Use(manual) => Some(self.resolve(&mut tx, page, manual).await?),
            UrlAction::Generate => {
                Some(self.resolve(&mut tx, page, generate_url(&page.title)).await?)
            }
        };

        let updated_at = Utc::now();

        let id = match page.id {
            Some(id) => {
                update_row(&mut tx, page, url.as_deref(), updated_at, id).await?;
                id
            }
            None => insert_row(&mut tx, page, url.as_deref(), updated_at).await?,
        };

        tx.commit().await.context("Failed to commit transaction")?;

        tracing::debug!(page_id = id, url = ?url, "page flushed");
        Ok((id, url, updated_at))
    }

    /// Resolve a candidate URL against the committed pages of the site,
    /// inside the saving transaction. The taken set is fetched fresh on
    /// every flush, so URLs freed by earlier removals are reused.
    async fn resolve(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        page: &Page,
        candidate: String,
    ) -> Result<String> {
        if !self.policy.preserve_unicity || candidate.is_empty() {
            return Ok(candidate);
        }

        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT url
            FROM pages
            WHERE site_id = ? AND (url = ? OR url LIKE ? || '-%') AND (? IS NULL OR id != ?)
            "#,
        )
        .bind(page.site_id)
        .bind(&candidate)
        .bind(&candidate)
        .bind(page.id)
        .bind(page.id)
        .fetch_all(&mut **tx)
        .await
        .context("Failed to load competing urls")?;

        let taken: HashSet<String> = rows.into_iter().map(|(url,)| url).collect();

        resolve_unique(&candidate, |probe| Ok(taken.contains(probe)))
    }
}

async fn load_snapshot(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<PageSnapshot> {
    let (title, url, state) = sqlx::query_as::<_, (String, Option<String>, String)>(
        "SELECT title, url, state FROM pages WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
    .context("Failed to load persisted page state")?
    .ok_or_else(|| anyhow!("Page with id {} not found", id))?;

    Ok(PageSnapshot {
        title,
        url,
        state: PageState::parse(&state).map_err(|e| anyhow!(e))?,
    })
}

async fn insert_row(
    tx: &mut Transaction<'_, Sqlite>,
    page: &Page,
    url: Option<&str>,
    updated_at: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO pages (site_id, parent_page_id, title, url, state, position, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(page.site_id)
    .bind(page.parent_page_id)
    .bind(&page.title)
    .bind(url)
    .bind(page.state.as_str())
    .bind(page.position)
    .bind(page.created_at)
    .bind(updated_at)
    .execute(&mut **tx)
    .await
    .context("Failed to insert page")?;

    Ok(result.last_insert_rowid())
}

async fn update_row(
    tx: &mut Transaction<'_, Sqlite>,
    page: &Page,
    url: Option<&str>,
    updated_at: DateTime<Utc>,
    id: i64,
) -> Result<()> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE pages
        SET site_id = ?, parent_page_id = ?, title = ?, url = ?, state = ?, position = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(page.site_id)
    .bind(page.parent_page_id)
    .bind(&page.title)
    .bind(url)
    .bind(page.state.as_str())
    .bind(page.position)
    .bind(updated_at)
    .bind(id)
    .execute(&mut **tx)
    .await
    .context("Failed to update page")?
    .rows_affected();

    if rows_affected == 0 {
        return Err(anyhow!("Page with id {} not found", id));
    }

    Ok(())
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .map(|db| db.kind() == sqlx::error::ErrorKind::UniqueViolation)
            .unwrap_or(false)
    })
}
