//! Raw scraper dump loading
//!
//! A dump is a JSON file holding either a bare array of records or an object
//! `{ "metadata": {...}, "products": [...] }`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, warn};

use super::catalog_error::{CatalogError, CatalogResult};
use crate::domain::constants::vendor;
use crate::domain::raw_record::RawRecord;

/// Records read from one dump file
#[derive(Debug, Clone, PartialEq)]
pub struct RawDump {
    pub path: PathBuf,
    /// `metadata.url` when the dump carries one
    pub url: Option<String>,
    pub records: Vec<RawRecord>,
    /// Array entries that were not objects
    pub skipped: usize,
}

/// Finds and reads per-category dumps from a directory
#[derive(Debug, Clone)]
pub struct RawDumpLoader {
    dump_dir: PathBuf,
}

impl RawDumpLoader {
    pub fn new(dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            dump_dir: dump_dir.into(),
        }
    }

    pub fn dump_dir(&self) -> &Path {
        &self.dump_dir
    }

    /// Latest `coles_<category>_*.json`, otherwise `<category>.json`
    pub async fn find_dump(&self, category: &str) -> CatalogResult<Option<PathBuf>> {
        let prefix = format!("{}_{}_", vendor::FILE_PREFIX, category);
        let mut latest: Option<String> = None;

        let mut entries = match fs::read_dir(&self.dump_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("⚠️ Dump directory {:?} does not exist", self.dump_dir);
                return Ok(None);
            }
            Err(e) => return Err(CatalogError::io(&self.dump_dir, e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CatalogError::io(&self.dump_dir, e))?
        {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with(&prefix)
                && name.ends_with(".json")
                && latest.as_ref().is_none_or(|current| name > *current)
            {
                latest = Some(name);
            }
        }

        if let Some(name) = latest {
            return Ok(Some(self.dump_dir.join(name)));
        }

        let plain = self.dump_dir.join(format!("{category}.json"));
        match fs::try_exists(&plain).await {
            Ok(true) => Ok(Some(plain)),
            Ok(false) => Ok(None),
            Err(e) => Err(CatalogError::io(&plain, e)),
        }
    }

    /// Load the dump for a category; `None` when there is no dump file
    pub async fn load_category(&self, category: &str) -> CatalogResult<Option<RawDump>> {
        match self.find_dump(category).await? {
            Some(path) => Self::load_file(&path).await.map(Some),
            None => {
                warn!("⚠️ No raw dump found for category {} in {:?}", category, self.dump_dir);
                Ok(None)
            }
        }
    }

    pub async fn load_file(path: &Path) -> CatalogResult<RawDump> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CatalogError::io(path, e))?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| CatalogError::json(path, e))?;

        let dump = parse_dump(path, value)?;
        info!(
            "📥 Loaded {} raw records from {:?} ({} skipped)",
            dump.records.len(),
            path,
            dump.skipped
        );
        Ok(dump)
    }
}

/// Interpret a decoded dump document
pub fn parse_dump(path: &Path, value: Value) -> CatalogResult<RawDump> {
    let (url, items) = match value {
        Value::Array(items) => (None, items),
        Value::Object(mut map) => {
            let url = map
                .get("metadata")
                .and_then(|metadata| metadata.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string);
            match map.remove("products") {
                Some(Value::Array(items)) => (url, items),
                Some(_) => {
                    return Err(CatalogError::invalid_dump(path, "`products` is not an array"));
                }
                None => return Err(CatalogError::invalid_dump(path, "missing `products` array")),
            }
        }
        _ => {
            return Err(CatalogError::invalid_dump(
                path,
                "expected an array or an object with `products`",
            ));
        }
    };

    let total = items.len();
    let records: Vec<RawRecord> = items.into_iter().filter_map(RawRecord::from_json).collect();
    let skipped = total - records.len();
    if skipped > 0 {
        warn!("⚠️ Skipped {} non-object entries in {:?}", skipped, path);
    }
    debug!("Parsed dump {:?}: url={:?}", path, url);

    Ok(RawDump {
        path: path.to_path_buf(),
        url,
        records,
        skipped,
    })
}
