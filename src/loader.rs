use crate::model::CountryRecord;
use crate::text::{MAX_TEXT_LEN, truncate_at};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data directory does not exist: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("no data file for country {code} in {}", .dir.display())]
    NotFound { code: String, dir: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("country data in {} is not a JSON object", .0.display())]
    NotAnObject(PathBuf),

    #[error("failed to list {}: {source}", .dir.display())]
    Walk {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    max_text_len: usize,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_text_len: MAX_TEXT_LEN,
        }
    }

    pub fn with_max_text_len(mut self, max_text_len: usize) -> Self {
        self.max_text_len = max_text_len;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn countries(&self) -> Result<Vec<(String, PathBuf)>, LoadError> {
        if !self.root.is_dir() {
            return Err(LoadError::MissingDir(self.root.clone()));
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| LoadError::Walk {
                dir: self.root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            found.push((stem.to_ascii_uppercase(), path.to_path_buf()));
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(found)
    }

    pub fn find(&self, code: &str) -> Result<PathBuf, LoadError> {
        self.countries()?
            .into_iter()
            .find(|(found, _)| found.eq_ignore_ascii_case(code.trim()))
            .map(|(_, path)| path)
            .ok_or_else(|| LoadError::NotFound {
                code: code.trim().to_ascii_uppercase(),
                dir: self.root.clone(),
            })
    }

    pub fn load(&self, code: &str) -> Result<CountryRecord, LoadError> {
        let path = self.find(code)?;
        self.load_file(&path)
    }

    pub fn load_file(&self, path: &Path) -> Result<CountryRecord, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut data: Value = serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if !data.is_object() {
            return Err(LoadError::NotAnObject(path.to_path_buf()));
        }
        limit_texts(&mut data, self.max_text_len);

        let code = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        debug!(country = code, path = %path.display(), "country data loaded");
        Ok(CountryRecord::new(code, data))
    }
}

pub fn limit_texts(value: &mut Value, limit: usize) {
    match value {
        Value::String(text) => {
            if text.len() > limit {
                let kept = truncate_at(text, limit).len();
                text.truncate(kept);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| limit_texts(item, limit)),
        Value::Object(map) => map.values_mut().for_each(|item| limit_texts(item, limit)),
        _ => {}
    }
}
