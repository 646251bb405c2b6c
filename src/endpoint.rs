//! API root handling and relative path joining

use reqwest::Url;

use crate::errors::Error;

/// Validated API root that relative endpoint paths are joined onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    root: String,
}

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();
        let root = if raw.starts_with("http") {
            raw.to_string()
        } else {
            format!("https://{}", raw)
        };
        Url::parse(&root)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", root, e)))?;
        Ok(Self {
            root: root.trim_end_matches('/').to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.root
    }

    /// Joins with exactly one `/`, whatever slashes either side carries.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.root, path.trim_start_matches('/'))
    }
}
