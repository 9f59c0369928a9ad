// The project collection plus everything you can ask of it
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::category::Category;
use crate::filter::{filter, FilterCriteria};
use crate::models::{normalize_category, ProjectRecord};
use crate::pagination::{paginate, DEFAULT_PAGE_SIZE};
use crate::related::{related, RelatedProject};
use crate::source::CatalogSource;
use crate::{Error, Result};

/// How a query is paged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub page_size: usize,
    /// Pull an out-of-range page back to the last page instead of returning
    /// an empty one
    pub clamp_page: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            clamp_page: true,
        }
    }
}

/// What the grid renders: the current page and enough to draw pagination
#[derive(Debug, Clone, Serialize)]
pub struct FilteredResult<'a> {
    pub items: Vec<&'a ProjectRecord>,
    /// Matches across all pages
    pub total_count: usize,
    pub page_count: usize,
    /// Page actually shown (after clamping, if enabled)
    pub page: usize,
    pub page_size: usize,
    pub criteria: FilterCriteria,
}

impl<'a> FilteredResult<'a> {
    /// Filter, then page, a collection
    pub fn compute(
        collection: &'a [ProjectRecord],
        criteria: &FilterCriteria,
        options: &QueryOptions,
    ) -> Self {
        let matched = filter(collection, criteria);
        let page_size = options.page_size.max(1);
        let requested = criteria.page.max(1);

        let mut page = paginate(&matched, requested, page_size);
        let mut shown = requested;

        if options.clamp_page && requested > page.page_count {
            debug!(
                "Page {} out of range ({} pages), showing last page",
                requested, page.page_count
            );
            shown = page.page_count;
            page = paginate(&matched, shown, page_size);
        }

        Self {
            items: page.items,
            total_count: matched.len(),
            page_count: page.page_count,
            page: shown,
            page_size,
            criteria: criteria.clone().with_page(shown),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// 1-based position range of the shown items, e.g. (10, 18); None when empty
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }
}

/// The catalog document is usually a bare array, some sites wrap it
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Bare(Vec<serde_json::Value>),
    Wrapped { projects: Vec<serde_json::Value> },
}

/// Records out of a catalog document, bare or wrapped
pub fn parse_records(json: &str) -> Result<Vec<ProjectRecord>> {
    let document: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| Error::CatalogError(format!("Failed to parse catalog JSON: {}", e)))?;
    records_from_value(document)
}

/// Records out of an already-parsed document.
///
/// Entries that don't look like a project are skipped with a warning; only
/// a document that isn't a project list at all is an error.
pub fn records_from_value(document: serde_json::Value) -> Result<Vec<ProjectRecord>> {
    let entries = match serde_json::from_value(document) {
        Ok(CatalogDocument::Bare(entries)) => entries,
        Ok(CatalogDocument::Wrapped { projects }) => projects,
        Err(_) => {
            return Err(Error::CatalogError(
                "Expected an array of projects or an object with a \"projects\" array".into(),
            ))
        }
    };

    let total = entries.len();
    let records: Vec<ProjectRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed project at position {}: {}", position, e);
                None
            }
        })
        .collect();

    if records.len() < total {
        info!("Kept {} of {} catalog entries", records.len(), total);
    }

    Ok(records)
}

/// Immutable, slug-indexed collection of project records
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ProjectRecord>,
    by_slug: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, making sure every record has a unique slug.
    ///
    /// Records without a slug get one from their title (or id). A record
    /// whose slug is already taken is dropped - the first one wins.
    pub fn from_records(records: Vec<ProjectRecord>) -> Self {
        let mut kept = Vec::with_capacity(records.len());
        let mut by_slug = HashMap::with_capacity(records.len());

        for (position, mut record) in records.into_iter().enumerate() {
            if record.slug.trim().is_empty() {
                record.slug = derive_slug(&record, position);
                debug!("Derived slug '{}' for '{}'", record.slug, record.title);
            }

            if by_slug.contains_key(&record.slug) {
                warn!(
                    "Duplicate slug '{}' at position {}, dropping '{}'",
                    record.slug, position, record.title
                );
                continue;
            }

            if record.id.is_empty() {
                record.id = record.slug.clone();
            }
            record.category = normalize_category(&record.category);

            by_slug.insert(record.slug.clone(), kept.len());
            kept.push(record);
        }

        Self {
            records: kept,
            by_slug,
        }
    }

    /// Parse a JSON catalog document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_records(parse_records(json)?))
    }

    /// Load through any source (file, HTTP, or a test double)
    pub async fn load(source: &dyn CatalogSource) -> Result<Self> {
        let records = source.load().await?;
        let catalog = Self::from_records(records);
        info!(
            "Loaded {} projects from {}",
            catalog.len(),
            source.describe()
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&ProjectRecord> {
        self.by_slug.get(slug).map(|&i| &self.records[i])
    }

    /// Like `get`, but a missing slug is an error
    pub fn require(&self, slug: &str) -> Result<&ProjectRecord> {
        self.get(slug)
            .ok_or_else(|| Error::NotFound(slug.to_string()))
    }

    /// Matching records, unpaged
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&ProjectRecord> {
        filter(&self.records, criteria)
    }

    /// Matching records, paged
    pub fn query(&self, criteria: &FilterCriteria, options: &QueryOptions) -> FilteredResult<'_> {
        FilteredResult::compute(&self.records, criteria, options)
    }

    /// Projects sharing tags with `slug`, best match first
    pub fn related(&self, slug: &str, limit: usize) -> Result<Vec<RelatedProject<'_>>> {
        let target = self.require(slug)?;
        Ok(related(target, &self.records, limit))
    }

    /// How many projects fall in each category.
    ///
    /// Known categories come first in matching order, then any custom
    /// explicit categories in first-seen order, then `general`. Empty
    /// categories are left out.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut custom: Vec<&str> = Vec::new();
        let known: HashSet<&str> = Category::all().iter().map(|c| c.as_str()).collect();

        for record in &self.records {
            let category = record.effective_category();
            if !known.contains(category) && !counts.contains_key(category) {
                custom.push(category);
            }
            *counts.entry(category).or_insert(0) += 1;
        }

        let general = Category::General.as_str();
        let mut order: Vec<&str> = Category::all()
            .iter()
            .map(|c| c.as_str())
            .filter(|name| *name != general)
            .collect();
        order.extend(custom);
        order.push(general);

        order
            .into_iter()
            .filter_map(|name| counts.get(name).map(|&n| (name.to_string(), n)))
            .collect()
    }

    /// Tag usage, most used first, ties alphabetical
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &self.records {
            let unique: HashSet<&str> = record.tags.iter().map(String::as_str).collect();
            for tag in unique {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, n)| (tag.to_string(), n))
            .collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        tags
    }

    /// Distinct client names in first-seen order
    pub fn clients(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.client.trim())
            .filter(|client| !client.is_empty() && seen.insert(*client))
            .collect()
    }
}

fn derive_slug(record: &ProjectRecord, position: usize) -> String {
    let from_title = slugify(&record.title);
    if !from_title.is_empty() {
        return from_title;
    }
    let from_id = slugify(&record.id);
    if !from_id.is_empty() {
        return from_id;
    }
    format!("project-{}", position + 1)
}

/// Lower-case ASCII letters and digits joined by single dashes
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
