//! The saved-drawings collection: an ordered list of persisted tokens,
//! newest first, stored as one JSON file.
//!
//! Gallery analytics stay with the host: it tracks
//! `AnalyticsEvent::GalleryOpened` when the browser opens and
//! `AnalyticsEvent::DrawingDeleted` after a confirmed removal.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::token::ContentToken;

pub const COLLECTION_FILE_NAME: &str = "tiny-doodle-drawings.json";

/// Prompt a host shows before removing a drawing.
pub const DELETE_CONFIRM_PROMPT: &str = "Delete this drawing? This cannot be undone!";

/// One saved drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingRecord {
    pub id: String,
    pub token: ContentToken,
    pub created_at_ms: i64,
}

impl DrawingRecord {
    pub fn new(token: ContentToken, created_at: DateTime<Local>) -> Self {
        let created_at_ms = created_at.timestamp_millis();
        Self {
            id: created_at_ms.to_string(),
            token,
            created_at_ms,
        }
    }
}

/// All saved drawings. Serialises as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingCollection {
    records: Vec<DrawingRecord>,
}

impl DrawingCollection {
    pub fn records(&self) -> &[DrawingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds a drawing at the front, so the collection stays newest first.
    pub fn add(&mut self, record: DrawingRecord) {
        self.records.insert(0, record);
    }

    /// Removes the drawing with the given id, reporting whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        before != self.records.len()
    }
}

/// Loads a collection, treating a missing file as empty. Read and parse
/// failures propagate.
pub fn load_from_path(path: &Path) -> Result<DrawingCollection> {
    if !path.exists() {
        return Ok(DrawingCollection::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read drawings file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("deserialize drawings file {}", path.display()))
}

/// Like [`load_from_path`] but degrades a broken store to an empty
/// collection, so one corrupt file never takes the gallery down.
pub fn load_or_default(path: &Path) -> DrawingCollection {
    match load_from_path(path) {
        Ok(collection) => collection,
        Err(err) => {
            tracing::error!(error = ?err, "failed to load drawings, starting empty");
            DrawingCollection::default()
        }
    }
}

pub fn save_to_path(path: &Path, collection: &DrawingCollection) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create drawings parent folder {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(collection).context("serialize drawings")?;
    std::fs::write(path, json)
        .with_context(|| format!("write drawings file {}", path.display()))
}
