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

use crate::models::state::PageState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub id: Option<i64>,
    pub site_id: i64,
    pub parent_page_id: Option<i64>,
    pub title: String,
    /// `None` until a URL has been generated or supplied. The empty
    /// string is a distinct value: it is what generation yields for an
    /// empty title, and setting it explicitly requests regeneration.
    pub url: Option<String>,
    pub state: PageState,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn new(site_id: i64, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            site_id,
            parent_page_id: None,
            title,
            url: None,
            state: PageState::Offline,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_with_parent(site_id: i64, parent_page_id: i64, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            site_id,
            parent_page_id: Some(parent_page_id),
            title,
            url: None,
            state: PageState::Offline,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set an explicit URL at construction time.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_page_id.is_none()
    }

    pub fn validate_title(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        if self.title.len() > 255 {
            return Err("Title cannot exceed 255 characters".to_string());
        }

        // Title should not be just whitespace
        if self.title.trim().is_empty() {
            return Err("Title cannot be only whitespace".to_string());
        }

        Ok(())
    }

    pub fn validate_url(&self) -> Result<(), String> {
        let url = match &self.url {
            // An ungenerated or empty URL is a valid value
            None => return Ok(()),
            Some(url) if url.is_empty() => return Ok(()),
            Some(url) => url,
        };

        if url.len() > 255 {
            return Err("URL cannot exceed 255 characters".to_string());
        }

        if !url.starts_with('/') {
            return Err("URL must start with a slash".to_string());
        }

        // The bare slash is the reserved root URL
        if url == "/" {
            return Ok(());
        }

        if url.ends_with('/') {
            return Err("URL cannot end with a slash".to_string());
        }

        if url.contains("//") {
            return Err("URL cannot contain consecutive slashes".to_string());
        }

        if url.contains(' ') {
            return Err("URL cannot contain spaces".to_string());
        }

        let valid_chars =
            |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '/';

        if !url.chars().all(valid_chars) {
            return Err(
                "URL can only contain letters, numbers, hyphens, underscores, dots, and slashes"
                    .to_string(),
            );
        }

        Ok(())
    }

    pub fn is_valid(&self) -> Result<(), String> {
        self.validate_title()?;
        self.validate_url()?;
        Ok(())
    }
}
