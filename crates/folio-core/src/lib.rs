// Portfolio collection engine - filtering, search, pagination and related projects
pub mod catalog;
pub mod category;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod query;
pub mod related;
pub mod source;

pub use catalog::{Catalog, FilteredResult, QueryOptions};
pub use category::{extract_category, Category};
pub use config::Config;
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use filter::{filter, CategoryFilter, FilterCriteria};
pub use models::ProjectRecord;
pub use pagination::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use related::{related, similarity, RelatedProject};
pub use source::{source_for, CatalogSource, FileSource, HttpSource};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
