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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    pub id: Option<i64>,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    pub fn new(label: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            label,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate_label(&self) -> Result<(), String> {
        if self.label.trim().is_empty() {
            return Err("Site label cannot be empty".to_string());
        }

        if self.label.len() > 255 {
            return Err("Site label cannot exceed 255 characters".to_string());
        }

        Ok(())
    }
}
