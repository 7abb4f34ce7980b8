//! Per-entry row data.
//!
//! A [`RowData`] maps column keys to pre-rendered cells. It is produced by
//! whatever collects entry metadata and consumed by the table, which looks up
//! one cell per selected column and leaves the rest blank.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::column::ColumnKey;
use crate::theme::Tone;

/// A single pre-rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone: Some(tone),
        }
    }

    /// Builder: set the tone, replacing any existing one
    pub fn with_tone(mut self, tone: Option<Tone>) -> Self {
        self.tone = tone;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::plain(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::plain(text)
    }
}

/// Cells of one entry, keyed by column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowData {
    cells: HashMap<ColumnKey, Cell>,
}

impl RowData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the cell for `key`
    pub fn with(mut self, key: ColumnKey, cell: impl Into<Cell>) -> Self {
        self.insert(key, cell);
        self
    }

    pub fn insert(&mut self, key: ColumnKey, cell: impl Into<Cell>) {
        self.cells.insert(key, cell.into());
    }

    pub fn get(&self, key: ColumnKey) -> Option<&Cell> {
        self.cells.get(&key)
    }

    /// The cells for `keys` in order, blank where a key has no value.
    pub fn cells_for(&self, keys: &[ColumnKey]) -> Vec<Cell> {
        keys.iter()
            .map(|key| self.get(*key).cloned().unwrap_or_default())
            .collect()
    }
}
