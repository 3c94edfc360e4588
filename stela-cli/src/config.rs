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
use std::env;
use stela_core::RewritePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub policy: RewritePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:stela.db".to_string()),
            policy: RewritePolicy {
                preserve_unicity: parse_flag("PRESERVE_UNICITY", true)?,
                preserve_online: parse_flag("PRESERVE_ONLINE", true)?,
            },
        })
    }
}

fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("Invalid {} (expected true or false)", name)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_defaults_when_unset() {
        assert!(parse_flag("STELA_TEST_FLAG_UNSET", true).unwrap());
        assert!(!parse_flag("STELA_TEST_FLAG_UNSET", false).unwrap());
    }

    #[test]
    fn test_parse_flag_reads_value() {
        env::set_var("STELA_TEST_FLAG_READS", "false");
        assert!(!parse_flag("STELA_TEST_FLAG_READS", true).unwrap());

        env::set_var("STELA_TEST_FLAG_READS", "true");
        assert!(parse_flag("STELA_TEST_FLAG_READS", false).unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        env::set_var("STELA_TEST_FLAG_GARBAGE", "yes please");
        assert!(parse_flag("STELA_TEST_FLAG_GARBAGE", true).is_err());
    }
}
