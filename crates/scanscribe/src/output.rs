//! Collects page records across a run and writes them out as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OutputError;
use crate::model::PageRecord;
use crate::sanitize::redact_path;

const JSON_INDENT: &[u8] = b"    ";

/// Page records in document-input order, then page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCollection {
    records: Vec<PageRecord>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one document's records. Callers append documents in input order.
    pub fn extend_document(&mut self, records: Vec<PageRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn into_inner(self) -> Vec<PageRecord> {
        self.records
    }

    /// Indented JSON with non-ASCII characters left unescaped.
    pub fn to_json_pretty(&self) -> Result<String, OutputError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.records.serialize(&mut serializer)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), OutputError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| OutputError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| OutputError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(file = %redact_path(path), records = self.len(), "Results written");
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a PageRecord;
    type IntoIter = std::slice::Iter<'a, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
