use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::CONFIG;

/// On-disk shape: DS champ id -> { "columnId": grist column }.
#[derive(Debug, Deserialize)]
struct MappingFile {
    #[serde(default)]
    field_mappings: HashMap<String, FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    #[serde(rename = "columnId")]
    column_id: Option<String>,
}

/// The inverted mapping the service works with: grist column -> DS champ id.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    mappings: HashMap<String, String>,
    filename: Option<String>,
}

/// What the index page popup reports about the mapping.
#[derive(Debug, Clone, Serialize)]
pub struct MappingStatus {
    pub loaded: bool,
    pub filename: Option<String>,
    pub mappings_count: usize,
}

impl FieldMapping {
    /// Load the mapping from the configured file path. Any failure leaves
    /// the mapping empty; `/search` then answers 500 until it is fixed.
    pub fn load() -> Self {
        match CONFIG.config_file_path.as_deref() {
            Some(path) => Self::from_file(path),
            None => {
                tracing::warn!("CONFIG_FILE_PATH is not set, field mapping unavailable");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &str) -> Self {
        let filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(path, error = %err, "failed to read field mapping file");
                return Self::default();
            }
        };

        match Self::from_json(&raw) {
            Ok(mut mapping) => {
                mapping.filename = filename;
                tracing::info!(path, mappings = mapping.len(), "field mapping loaded");
                mapping
            }
            Err(err) => {
                tracing::warn!(path, error = %err, "failed to parse field mapping file");
                Self::default()
            }
        }
    }

    /// Parse and invert the mapping file content.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file: MappingFile = serde_json::from_str(raw)?;

        let mut mappings = HashMap::new();
        for (ds_field_id, entry) in file.field_mappings {
            if let Some(column) = entry.column_id {
                mappings.insert(column, ds_field_id);
            }
        }

        Ok(Self {
            mappings,
            filename: None,
        })
    }

    /// DS champ id for a grist column, if mapped.
    pub fn get(&self, grist_column: &str) -> Option<&str> {
        self.mappings.get(grist_column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn status(&self) -> MappingStatus {
        MappingStatus {
            loaded: !self.is_empty(),
            filename: self.filename.clone(),
            mappings_count: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "field_mappings": {
            "Q2hhbXAtNjIyMzQw": {"columnId": "titre_du_projet"},
            "Q2hhbXAtNjIyMzQx": {"columnId": "Nom_maj_"},
            "Q2hhbXAtNjIyMzQy": {}
        }
    }"#;

    #[test]
    fn test_inversion() {
        let mapping = FieldMapping::from_json(SAMPLE).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("titre_du_projet"), Some("Q2hhbXAtNjIyMzQw"));
        assert_eq!(mapping.get("Nom_maj_"), Some("Q2hhbXAtNjIyMzQx"));
        assert_eq!(mapping.get("unmapped"), None);
    }

    #[test]
    fn test_entries_without_column_id_are_skipped() {
        let mapping = FieldMapping::from_json(SAMPLE).unwrap();
        // the third entry has no columnId and must not be counted
        assert!(!mapping.mappings.values().any(|id| id == "Q2hhbXAtNjIyMzQy"));
    }

    #[test]
    fn test_status() {
        let mapping = FieldMapping::from_json(SAMPLE).unwrap();
        let status = mapping.status();
        assert!(status.loaded);
        assert_eq!(status.mappings_count, 2);

        let empty = FieldMapping::default();
        assert!(!empty.status().loaded);
        assert_eq!(empty.status().mappings_count, 0);
    }

    #[test]
    fn test_missing_file_yields_empty_mapping() {
        let mapping = FieldMapping::from_file("/nonexistent/mapping.json");
        assert!(mapping.is_empty());
    }
}
