// Coarse project categories, inferred from tags and titles
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Top-level category buckets shown as filter tabs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WebDesign,
    Branding,
    Motion,
    ProductDesign,
    Illustration,
    Print,
    /// Nothing matched
    General,
}

/// Category -> keywords, checked top to bottom.
///
/// Order matters: the first category with a hit wins, so reordering this
/// table re-categorizes existing content.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::WebDesign,
        &["web", "website", "landing", "ux", "interface"],
    ),
    (
        Category::Branding,
        &["brand", "identity", "logo", "visual identity"],
    ),
    (Category::Motion, &["motion", "animation", "video", "3d"]),
    (
        Category::ProductDesign,
        &["product", "app", "mobile", "saas", "dashboard"],
    ),
    (
        Category::Illustration,
        &["illustration", "drawing", "artwork"],
    ),
    (
        Category::Print,
        &["print", "editorial", "packaging", "poster", "book"],
    ),
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::WebDesign => "web-design",
            Category::Branding => "branding",
            Category::Motion => "motion",
            Category::ProductDesign => "product-design",
            Category::Illustration => "illustration",
            Category::Print => "print",
            Category::General => "general",
        }
    }

    /// Human-friendly name for tabs and listings
    pub fn label(&self) -> &'static str {
        match self {
            Category::WebDesign => "Web Design",
            Category::Branding => "Branding",
            Category::Motion => "Motion",
            Category::ProductDesign => "Product Design",
            Category::Illustration => "Illustration",
            Category::Print => "Print",
            Category::General => "General",
        }
    }

    /// All categories in matching order, `General` last
    pub fn all() -> Vec<Category> {
        CATEGORY_KEYWORDS
            .iter()
            .map(|(category, _)| *category)
            .chain(std::iter::once(Category::General))
            .collect()
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        CATEGORY_KEYWORDS
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::all()
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// Work out a record's category from its tags, falling back to its title.
///
/// A category matches when any of its keywords is a substring of a
/// lower-cased tag (or of the lower-cased title in the fallback pass).
/// Always returns something; `General` when nothing matches.
pub fn extract_category<S: AsRef<str>>(tags: &[S], title: &str) -> Category {
    let tags: Vec<String> = tags.iter().map(|t| t.as_ref().to_lowercase()).collect();

    let hit = CATEGORY_KEYWORDS.iter().find(|(_, keywords)| {
        keywords
            .iter()
            .any(|keyword| tags.iter().any(|tag| tag.contains(keyword)))
    });

    if let Some((category, _)) = hit {
        return *category;
    }

    let title = title.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| title.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}
