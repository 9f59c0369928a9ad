// HTTP plumbing for pulling the catalog document off a static host
pub mod client;
pub mod retry;

pub use client::{CatalogClient, FetchError};
pub use retry::RetryConfig;
