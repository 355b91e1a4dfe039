use crate::error::RetrievalError;
use crate::schema::LevelRecord;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Anything that can hand over a raw ranked list once.
pub trait CatalogSource {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<Vec<LevelRecord>, RetrievalError>;
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CatalogSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<LevelRecord>, RetrievalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let resp = client.get(&self.url).send()?.error_for_status()?;
        let body = resp.text()?;
        decode_records(&body)
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<LevelRecord>, RetrievalError> {
        let body = fs::read_to_string(&self.path)?;
        decode_records(&body)
    }
}

/// Yields nothing, which sends the loader straight to the built-in list.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSource;

impl CatalogSource for FallbackSource {
    fn describe(&self) -> String {
        "built-in list".to_string()
    }

    fn fetch(&self) -> Result<Vec<LevelRecord>, RetrievalError> {
        Ok(Vec::new())
    }
}

/// The body must be a JSON array. Entries that are not objects of the expected shape
/// are dropped one by one instead of failing the whole list.
pub fn decode_records(body: &str) -> Result<Vec<LevelRecord>, RetrievalError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(entries) = value else {
        return Err(RetrievalError::Decode(
            "expected a JSON array of levels".to_string(),
        ));
    };
    let total = entries.len();
    let records: Vec<LevelRecord> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if records.len() < total {
        tracing::debug!(
            dropped = total - records.len(),
            "ignored malformed level entries"
        );
    }
    Ok(records)
}
