//! URL query-string <-> `FilterCriteria`
//!
//! Recognized keys: `search`, `category`, `tags` (comma-joined), `client`
//! (comma-joined) and `page`. Anything else is ignored. Parsing never fails;
//! junk just falls back to the defaults.

use std::fmt;

use crate::filter::{dedupe, CategoryFilter, FilterCriteria};

pub const KEY_SEARCH: &str = "search";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_TAGS: &str = "tags";
pub const KEY_CLIENT: &str = "client";
pub const KEY_PAGE: &str = "page";

impl FilterCriteria {
    /// Build criteria from a query string like `?tags=web,ux&page=2`
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut criteria = FilterCriteria::default();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode(raw_key);

            // Later duplicates overwrite earlier ones
            match key.as_str() {
                KEY_SEARCH => criteria.search = decode(raw_value).trim().to_string(),
                KEY_CATEGORY => criteria.category = CategoryFilter::parse(&decode(raw_value)),
                KEY_TAGS => criteria.tags = decode_list(raw_value),
                KEY_CLIENT => criteria.clients = decode_list(raw_value),
                KEY_PAGE => criteria.page = parse_page(&decode(raw_value)),
                _ => {}
            }
        }

        criteria
    }

    /// Render back to a query string (without the leading `?`).
    ///
    /// Only non-default keys are written, always in the same order, so equal
    /// criteria give equal strings.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        let search = self.search.trim();
        if !search.is_empty() {
            parts.push(format!("{}={}", KEY_SEARCH, urlencoding::encode(search)));
        }

        if let CategoryFilter::Only(name) = &self.category {
            parts.push(format!("{}={}", KEY_CATEGORY, urlencoding::encode(name)));
        }

        if !self.tags.is_empty() {
            parts.push(format!("{}={}", KEY_TAGS, encode_list(&self.tags)));
        }

        if !self.clients.is_empty() {
            parts.push(format!("{}={}", KEY_CLIENT, encode_list(&self.clients)));
        }

        if self.page > 1 {
            parts.push(format!("{}={}", KEY_PAGE, self.page));
        }

        parts.join("&")
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Anything that isn't a positive integer means page 1
fn parse_page(raw: &str) -> usize {
    raw.trim().parse::<usize>().ok().filter(|p| *p >= 1).unwrap_or(1)
}

/// Percent-decode, with `+` as space (form encoding)
fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        // Invalid UTF-8 after decoding, keep the raw text
        Err(_) => spaced,
    }
}

/// Split on literal commas *before* decoding so `%2C` survives inside an item
fn decode_list(raw: &str) -> Vec<String> {
    dedupe(raw.split(',').map(decode))
}

fn encode_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| urlencoding::encode(item).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}
