use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::models::MediaIndexEntry;

/// Prebuilt mapping from granted-item id to known preview assets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaIndex {
    entries: HashMap<String, MediaIndexEntry>,
}

impl MediaIndex {
    /// Build an index from explicit entries.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, MediaIndexEntry)>,
        K: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, entry)| (id.into(), entry))
                .collect(),
        }
    }

    /// Parse an index document. Malformed entries are skipped.
    pub fn parse(contents: &str) -> Result<Self> {
        let document: HashMap<String, Value> =
            serde_json::from_str(contents).context("media index is not a JSON object")?;
        let mut entries = HashMap::with_capacity(document.len());
        for (id, value) in document {
            match serde_json::from_value::<MediaIndexEntry>(value) {
                Ok(entry) => {
                    entries.insert(id, entry);
                }
                Err(err) => warn!("skipping media index entry {id}: {err}"),
            }
        }
        Ok(Self { entries })
    }

    /// Read and parse an index file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read media index {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse media index {}", path.display()))
    }

    /// Entry for `id`, if any.
    pub fn get(&self, id: &str) -> Option<&MediaIndexEntry> {
        self.entries.get(id)
    }

    /// First entry among `ids` carrying video or audio.
    pub fn first_with_media<'a>(&'a self, ids: &[String]) -> Option<&'a MediaIndexEntry> {
        ids.iter()
            .filter_map(|id| self.entries.get(id))
            .find(|entry| entry.has_media())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lazily loaded media index, read at most once per store.
#[derive(Debug)]
pub struct MediaIndexStore {
    path: PathBuf,
    cell: OnceCell<MediaIndex>,
}

impl MediaIndexStore {
    /// Store reading its index from `path` on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Store holding an already loaded index.
    pub fn preloaded(index: MediaIndex) -> Self {
        Self {
            path: PathBuf::new(),
            cell: OnceCell::new_with(Some(index)),
        }
    }

    /// Whether the index has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// The index, loading it on first call. Load failures yield an empty index.
    pub async fn get(&self) -> &MediaIndex {
        self.cell
            .get_or_init(|| async {
                match MediaIndex::load(&self.path).await {
                    Ok(index) => {
                        info!(entries = index.len(), "loaded media index");
                        index
                    }
                    Err(err) => {
                        warn!("media index unavailable: {err:#}");
                        MediaIndex::default()
                    }
                }
            })
            .await
    }
}
