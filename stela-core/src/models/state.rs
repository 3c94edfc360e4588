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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication state of a page. Stored as TEXT in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageState {
    Offline,
    Online,
    Hidden,
}

impl PageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageState::Offline => "offline",
            PageState::Online => "online",
            PageState::Hidden => "hidden",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "offline" => Ok(PageState::Offline),
            "online" => Ok(PageState::Online),
            "hidden" => Ok(PageState::Hidden),
            _ => Err(format!(
                "Invalid page state '{}'. Valid states are: offline, online, hidden",
                value
            )),
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, PageState::Online)
    }
}

impl Default for PageState {
    fn default() -> Self {
        PageState::Offline
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
