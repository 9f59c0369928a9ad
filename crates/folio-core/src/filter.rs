use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::Category;
use crate::models::{normalize_category, ProjectRecord};

/// Sentinel for "no category filter", as it appears in URLs
pub const ALL_CATEGORIES: &str = "all";

/// Category narrowing: either everything or one named category
///
/// Kept as a string rather than `Category` so an unknown value coming from
/// a URL just yields no results instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `all`, empty, or whitespace means no filter. Names are lower-cased
    /// to line up with record categories.
    pub fn parse(value: &str) -> Self {
        let value = normalize_category(value);
        if value.is_empty() || value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(name) => name,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category.as_str().to_string())
    }
}

/// Everything the user narrowed the collection by
///
/// A plain value: derive it from the URL once, pass it down, and hash it
/// if you want to memoize results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: String,
    pub category: CategoryFilter,
    /// Match-any
    pub tags: Vec<String>,
    /// Match-any against the record's client name
    pub clients: Vec<String>,
    /// 1-based
    pub page: usize,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            tags: Vec::new(),
            clients: Vec::new(),
            page: 1,
        }
    }
}

impl FilterCriteria {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedupe(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_clients<I, S>(mut self, clients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clients = dedupe(clients.into_iter().map(Into::into));
        self
    }

    /// Page numbers below 1 are bumped to 1
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Back to page 1, for when the criteria narrowed and the old page may
    /// no longer exist
    pub fn reset_page(mut self) -> Self {
        self.page = 1;
        self
    }

    /// True when no predicate would narrow anything (page is not a filter)
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_all()
            && self.tags.is_empty()
            && self.clients.is_empty()
            && self.search.trim().is_empty()
    }

    /// Whether a single record passes every active predicate
    pub fn matches(&self, record: &ProjectRecord) -> bool {
        self.matches_category(record)
            && self.matches_tags(record)
            && self.matches_clients(record)
            && self.matches_search(record)
    }

    fn matches_category(&self, record: &ProjectRecord) -> bool {
        match &self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => {
                normalize_category(record.effective_category()) == normalize_category(name)
            }
        }
    }

    fn matches_tags(&self, record: &ProjectRecord) -> bool {
        self.tags.is_empty() || record.tags.iter().any(|tag| self.tags.contains(tag))
    }

    fn matches_clients(&self, record: &ProjectRecord) -> bool {
        let client = record.client.trim();
        self.clients.is_empty() || self.clients.iter().any(|wanted| wanted.as_str() == client)
    }

    fn matches_search(&self, record: &ProjectRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        record.title.to_lowercase().contains(&needle)
            || record.client.to_lowercase().contains(&needle)
            || record.objective.to_lowercase().contains(&needle)
            || record.tags.iter().any(|tag| tag.to_lowercase() == needle)
    }
}

/// Records passing every active predicate, in collection order
///
/// No re-sorting happens afterwards; the collection's order is the display
/// order.
pub fn filter<'a>(collection: &'a [ProjectRecord], criteria: &FilterCriteria) -> Vec<&'a ProjectRecord> {
    if criteria.is_unfiltered() {
        return collection.iter().collect();
    }

    let matched: Vec<&ProjectRecord> = collection
        .iter()
        .filter(|record| criteria.matches(record))
        .collect();

    debug!(
        "Filter kept {} of {} records ({:?})",
        matched.len(),
        collection.len(),
        criteria
    );

    matched
}

/// Drop blanks and repeats, keep first-seen order
pub(crate) fn dedupe<I: IntoIterator<Item = String>>(values: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim().to_string();
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
