use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::CONFIG;

/// One Grist record flattened to its fields, with the record id folded in
/// under the `id` key.
pub type Row = Map<String, Value>;

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    id: i64,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct GristClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    doc_id: String,
}

impl GristClient {
    /// Create a client with explicit settings. Useful for testing against a
    /// local stand-in of the Grist API.
    pub fn new(base_url: &str, api_key: &str, doc_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            doc_id: doc_id.to_string(),
        }
    }

    /// Create a client using environment configuration.
    pub fn from_config() -> Self {
        Self::new(
            &CONFIG.grist_base_url,
            &CONFIG.grist_api_key,
            &CONFIG.grist_doc_id,
        )
    }

    /// Fetch every record of a table as a flat row.
    pub async fn table_rows(&self, table_id: &str) -> Result<Vec<Row>> {
        let url = format!(
            "{}/docs/{}/tables/{}/records",
            self.base_url, self.doc_id, table_id
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to reach the Grist API")?
            .error_for_status()
            .context("Grist API returned an error status")?;

        let data: RecordsResponse = response
            .json()
            .await
            .context("Failed to decode Grist records")?;

        Ok(data
            .records
            .into_iter()
            .map(|record| {
                let mut row = record.fields;
                row.insert("id".to_string(), Value::from(record.id));
                row
            })
            .collect())
    }
}

/// String coercion of a cell. `None` for null, the bare text for strings,
/// the JSON rendering for everything else.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text_coercion() {
        assert_eq!(cell_text(&Value::Null), None);
        assert_eq!(cell_text(&json!("abc")), Some("abc".to_string()));
        assert_eq!(cell_text(&json!(0)), Some("0".to_string()));
        assert_eq!(cell_text(&json!(12.5)), Some("12.5".to_string()));
        assert_eq!(cell_text(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_records_response_shape() {
        let raw = json!({
            "records": [
                {"id": 7, "fields": {"Email": "a@b.com", "Pays": "France"}},
                {"id": 8}
            ]
        });
        let parsed: RecordsResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].id, 7);
        assert_eq!(parsed.records[1].fields.len(), 0);
    }

    #[test]
    fn test_missing_records_key_is_empty() {
        let parsed: RecordsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.records.is_empty());
    }
}
