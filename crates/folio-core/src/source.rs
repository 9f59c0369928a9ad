// Where the catalog document comes from - a file on disk or a static URL
use async_trait::async_trait;
use folio_source::{CatalogClient, RetryConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::catalog::{parse_records, records_from_value};
use crate::config::FetchConfig;
use crate::models::ProjectRecord;
use crate::{Error, Result};

/// Anything that can hand over the raw project list
///
/// Keeps the catalog ignorant of files vs HTTP, and makes testing easy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable location, for logs and errors
    fn describe(&self) -> String;

    async fn load(&self) -> Result<Vec<ProjectRecord>>;
}

/// Catalog bundled as a JSON file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Vec<ProjectRecord>> {
        debug!("Reading catalog file {}", self.path.display());
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::SourceError {
                source_name: self.describe(),
                message: e.to_string(),
            })?;
        parse_records(&contents)
    }
}

/// Catalog served over HTTP(S)
pub struct HttpSource {
    url: String,
    client: CatalogClient,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, fetch: &FetchConfig) -> Result<Self> {
        let url = url.into();
        let retry = RetryConfig {
            max_retries: fetch.max_retries,
            initial_delay_ms: fetch.initial_delay_ms,
            max_delay_ms: fetch.max_delay_ms,
            backoff_multiplier: fetch.backoff_multiplier,
        };

        let client = CatalogClient::with_retry_config(Duration::from_secs(fetch.timeout_secs), retry)
            .map_err(|e| Error::SourceError {
                source_name: url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<Vec<ProjectRecord>> {
        let document: serde_json::Value = self
            .client
            .fetch_json(&self.url)
            .await
            .map_err(|e| Error::SourceError {
                source_name: self.url.clone(),
                message: e.to_string(),
            })?;
        records_from_value(document)
    }
}

/// Pick a source from a location string: URLs go over HTTP, anything else
/// is treated as a file path
pub fn source_for(location: &str, fetch: &FetchConfig) -> Result<Box<dyn CatalogSource>> {
    let location = location.trim();
    if location.is_empty() {
        return Err(Error::ConfigError(
            "No catalog location configured. Pass --catalog or set catalog.location".into(),
        ));
    }

    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location, fetch)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source_loads_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"slug": "a", "title": "A", "tags": ["web"]}}, {{"slug": "b", "title": "B"}}]"#
        )
        .unwrap();

        let source = FileSource::new(file.path());
        let records = source.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tags, vec!["web"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nope.json"));

        let err = source.load().await.unwrap_err();
        assert!(matches!(err, Error::SourceError { .. }));
    }

    #[tokio::test]
    async fn test_catalog_loads_through_any_source() {
        let mut source = MockCatalogSource::new();
        source.expect_load().times(1).returning(|| {
            Ok(vec![
                ProjectRecord::new("one", "One"),
                ProjectRecord::new("two", "Two"),
                ProjectRecord::new("one", "Duplicate"),
            ])
        });
        source
            .expect_describe()
            .returning(|| "mock catalog".to_string());

        let catalog = Catalog::load(&source).await.unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let mut source = MockCatalogSource::new();
        source.expect_load().returning(|| {
            Err(Error::SourceError {
                source_name: "mock".into(),
                message: "boom".into(),
            })
        });
        source.expect_describe().returning(|| "mock".to_string());

        assert!(Catalog::load(&source).await.is_err());
    }

    #[tokio::test]
    async fn test_http_source_parses_wrapped_document() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = r#"{"projects": [{"slug": "a", "tags": "web"}, {"slug": "b", "title": 7}]}"#;

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        let source = HttpSource::new(format!("http://{}/projects.json", addr), &FetchConfig::default()).unwrap();
        let records = source.load().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug, "a");
        assert_eq!(records[0].tags, vec!["web"]);
    }

    #[test]
    fn test_source_for_picks_by_scheme() {
        let fetch = FetchConfig::default();

        let http = source_for("https://example.com/projects.json", &fetch).unwrap();
        assert_eq!(http.describe(), "https://example.com/projects.json");

        let file = source_for("data/projects.json", &fetch).unwrap();
        assert_eq!(file.describe(), "data/projects.json");

        assert!(matches!(source_for("  ", &fetch), Err(Error::ConfigError(_))));
    }
}
