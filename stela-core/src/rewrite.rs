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

use crate::models::page::Page;
use crate::models::state::PageState;
use crate::utils::slug::generate_slug;

/// URL rewrite behavior, read at flush time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewritePolicy {
    /// Deduplicate colliding URLs by appending a numeric suffix.
    pub preserve_unicity: bool,
    /// Stop regenerating the URL of a page once it has been saved online.
    pub preserve_online: bool,
}

impl Default for RewritePolicy {
    fn default() -> Self {
        Self {
            preserve_unicity: true,
            preserve_online: true,
        }
    }
}

/// The fields of a page as of its last committed save. Regeneration is
/// gated on this snapshot, not on the pending entity, which is what
/// grants one final rewrite to a page saved together with its move
/// online.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub title: String,
    pub url: Option<String>,
    pub state: PageState,
}

impl From<&Page> for PageSnapshot {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            url: page.url.clone(),
            state: page.state,
        }
    }
}

/// What a flush should do with a page's URL.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlAction {
    /// Leave the stored URL untouched.
    Keep,
    /// Honor a caller-supplied URL as-is (deduplicated only when
    /// `preserve_unicity` is on).
    Use(String),
    /// Derive the URL from the pending title.
    Generate,
}

/// Decide what to do with the page URL at the flush boundary.
///
/// Evaluated in order:
/// 1. a non-empty URL differing from the last committed value was set
///    manually and wins;
/// 2. a null or empty URL is (re)generated from the title, whatever the
///    page state — setting the URL to the empty string is a request for
///    regeneration;
/// 3. a title change regenerates unless the page was online at its last
///    save and `preserve_online` is set;
/// 4. otherwise the URL is kept.
pub fn decide_url_action(
    persisted: Option<&PageSnapshot>,
    pending: &Page,
    policy: &RewritePolicy,
) -> UrlAction {
    if let Some(url) = pending.url.as_deref() {
        let changed = persisted.map_or(true, |prev| prev.url.as_deref() != Some(url));
        if !url.is_empty() && changed {
            return UrlAction::Use(url.to_string());
        }
    }

    let prev = match persisted {
        Some(prev) => prev,
        None => return UrlAction::Generate,
    };

    if pending.url.as_deref().unwrap_or("").is_empty() {
        return UrlAction::Generate;
    }

    let title_changed = prev.title != pending.title;
    if title_changed && (!policy.preserve_online || prev.state != PageState::Online) {
        return UrlAction::Generate;
    }

    UrlAction::Keep
}

/// Build a page URL from a title: `/slug`, or the empty URL when the
/// title yields an empty slug. The bare `/` is never generated; it is
/// reserved for site roots.
pub fn generate_url(title: &str) -> String {
    let slug = generate_slug(title);
    if slug.is_empty() {
        String::new()
    } else {
        format!("/{}", slug)
    }
}
