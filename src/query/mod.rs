//! Query parsing module
//!
//! Handles the keyword string of the legacy endpoint, a list of place
//! names joined by a separator such as `starbucks&meat market&sessame`.

use crate::config::QuerySettings;
use serde::{Deserialize, Serialize};

/// Keywords extracted from a raw query string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Original raw query
    pub raw_query: String,
    /// Normalized keywords, in input order
    pub keywords: Vec<String>,
}

impl ParsedQuery {
    /// Parse with the default separator and wildcard wrapping
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, &QuerySettings::default())
    }

    /// Split `raw` on the configured separator. Each fragment is trimmed
    /// and lowercased; empty fragments are dropped.
    pub fn parse_with(raw: &str, settings: &QuerySettings) -> Self {
        let fragments: Vec<&str> = if settings.separator.is_empty() {
            vec![raw]
        } else {
            raw.split(settings.separator.as_str()).collect()
        };
        let keywords = fragments
            .into_iter()
            .map(|fragment| fragment.trim().to_lowercase())
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| normalize_keyword(&fragment, settings.wildcard))
            .collect();

        Self {
            raw_query: raw.to_string(),
            keywords,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Wrap a keyword as `*keyword*` when wildcards are on
pub fn normalize_keyword(keyword: &str, wildcard: bool) -> String {
    if wildcard {
        format!("*{}*", keyword)
    } else {
        keyword.to_string()
    }
}
