use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::category::{extract_category, Category};

/// One portfolio entry (a case study)
///
/// Presentation data, so deserialization is forgiving: any field may be
/// missing or `null` and simply comes out empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default, deserialize_with = "id_or_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, alias = "cover_image", deserialize_with = "null_as_default")]
    pub cover_image: String,

    /// Client name
    #[serde(default, alias = "client_name", deserialize_with = "null_as_default")]
    pub client: String,

    #[serde(default, alias = "client_logo", deserialize_with = "null_as_default")]
    pub client_logo: String,

    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,

    /// Explicit category slug; when empty the category is inferred from tags/title
    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "category_slug")]
    pub category: String,

    /// Summary text, shown on cards and searched
    #[serde(default, alias = "summary", deserialize_with = "null_as_default")]
    pub objective: String,

    #[serde(
        default,
        alias = "created_at",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        alias = "updated_at",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectRecord {
    /// Minimal record, mostly handy for tests and fixtures
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            id: slug.clone(),
            slug,
            title: title.into(),
            cover_image: String::new(),
            client: String::new(),
            client_logo: String::new(),
            tags: Vec::new(),
            category: String::new(),
            objective: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    pub fn with_category(mut self, category: impl AsRef<str>) -> Self {
        self.category = normalize_category(category.as_ref());
        self
    }

    /// Category inferred from tags and title, ignoring any explicit one
    pub fn inferred_category(&self) -> Category {
        extract_category(&self.tags, &self.title)
    }

    /// The category used for filtering: explicit if set, inferred otherwise
    pub fn effective_category(&self) -> &str {
        let explicit = self.category.trim();
        if explicit.is_empty() {
            self.inferred_category().as_str()
        } else {
            explicit
        }
    }
}

/// Explicit categories compare against lower-case slugs like `branding`
pub fn normalize_category(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Treat `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn category_slug<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: String = null_as_default(deserializer)?;
    Ok(normalize_category(&raw))
}

/// Tags as a list, a single string, or `null`; `null` entries are dropped
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTags {
        One(String),
        Many(Vec<Option<String>>),
    }

    Ok(match Option::<RawTags>::deserialize(deserializer)? {
        Some(RawTags::One(tag)) => vec![tag],
        Some(RawTags::Many(tags)) => tags.into_iter().flatten().collect(),
        None => Vec::new(),
    })
}

/// Unparseable timestamps are dropped rather than failing the whole record.
/// Bare dates (`2024-03-01`) are read as midnight UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    Ok(chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc()))
}

/// Ids show up as strings in some exports and as numbers in others
fn id_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => s,
        Some(RawId::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
