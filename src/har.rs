//! HAR 1.2 record types and file discovery.
//!
//! Only the slice of the HTTP Archive format the aggregator consumes is
//! modeled; unknown fields are ignored on deserialization. See
//! http://www.softwareishard.com/blog/har-12-spec/
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

// ------------------------------- Records ---------------------------------- //

#[derive(Debug, Clone, Deserialize)]
pub struct Har {
    pub log: Log,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// One recorded request/response transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub request: Request,
    pub response: Response,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    /// Recorder extension: the URL with path parameters re-templated
    /// (e.g. `/users/{user_id}`). Preferred over `url` when present.
    #[serde(default, rename = "_parameterized_url")]
    pub parameterized_url: Option<String>,
    #[serde(default, rename = "queryString")]
    pub query_string: Vec<Param>,
    #[serde(default)]
    pub headers: Vec<Param>,
    #[serde(default, rename = "postData")]
    pub post_data: Option<PostData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(default, rename = "statusText")]
    pub status_text: String,
    #[serde(default)]
    pub headers: Vec<Param>,
    #[serde(default)]
    pub content: Option<Content>,
}

/// Name/value pair used for both headers and query parameters. Names may
/// repeat across a list.
#[derive(Debug, Clone, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostData {
    #[serde(default, rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(default, rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

// ------------------------------- Reader ----------------------------------- //

/// Discovers `*.har` files under a directory (recursively) and concatenates
/// their entries in path order.
pub struct HarReader {
    directory: PathBuf,
}

impl HarReader {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self { directory: directory.as_ref().to_path_buf() }
    }

    pub fn entries(&self) -> Result<Vec<Entry>, Error> {
        let mut entries = Vec::new();
        for path in self.find_har_files()? {
            let har = Self::read_har_file(&path)?;
            entries.extend(har.log.entries);
        }
        Ok(entries)
    }

    fn find_har_files(&self) -> Result<Vec<PathBuf>, Error> {
        let pattern = self.directory.join("**").join("*.har");
        let mut paths = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            paths.push(entry?);
        }
        // glob yields sorted-per-directory results; sort globally anyway so
        // aggregation order never depends on traversal details
        paths.sort();
        Ok(paths)
    }

    fn read_har_file(path: &Path) -> Result<Har, Error> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::ReadHar {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&source).map_err(|source| Error::ParseHar {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ------------------------------- Tests ------------------------------------ //
