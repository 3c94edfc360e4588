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

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub mod page_repository;
pub mod site_repository;

pub use page_repository::*;
pub use site_repository::*;

/// SQLite hands back datetimes either as "YYYY-MM-DD HH:MM:SS"
/// (CURRENT_TIMESTAMP defaults) or as ISO8601 (bound chrono values).
pub(crate) fn parse_sqlite_datetime(value: &str) -> Result<DateTime<Utc>> {
    if value.contains('T') {
        Ok(DateTime::parse_from_rfc3339(value)
            .context("Failed to parse datetime as RFC3339")?
            .with_timezone(&Utc))
    } else {
        Ok(chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
            .context("Failed to parse datetime as SQLite format")?
            .and_utc())
    }
}
