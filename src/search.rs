use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::api::models::{ResultRow, SearchResponse};
use crate::columns::{collect_columns, find_aide_column, find_display_columns};
use crate::config::CONFIG;
use crate::grist::{GristClient, Row, cell_text};
use crate::mapping::FieldMapping;
use crate::prefill::DsClient;

/// Everything `/search` can answer besides results. Messages are the
/// user-facing text; the handler picks the HTTP status per variant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchServiceError {
    #[error("Aucune donnée trouvée dans la table")]
    EmptyTable,
    #[error("Mapping des champs non disponible. Vérifiez la configuration.")]
    MappingUnavailable,
    #[error("Aucun enregistrement trouvé pour l'email: {0}")]
    UnknownEmail(String),
    #[error("Aucun enregistrement trouvé pour l'email {0} pour un dossier Aide DGER")]
    NoAidRequest(String),
}

pub struct SearchService {
    grist: GristClient,
    ds: DsClient,
    mapping: FieldMapping,
    table_id: String,
}

impl SearchService {
    pub fn new(grist: GristClient, ds: DsClient, mapping: FieldMapping, table_id: &str) -> Self {
        Self {
            grist,
            ds,
            mapping,
            table_id: table_id.to_string(),
        }
    }

    pub fn from_config(mapping: FieldMapping) -> Self {
        Self::new(
            GristClient::from_config(),
            DsClient::from_config(),
            mapping,
            &CONFIG.grist_table_id,
        )
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// The whole pipeline behind `POST /search`: fetch the table, keep the
    /// rows for this email that carry an aid request, dedup, and attach a
    /// prefilled dossier URL to each.
    pub async fn search(&self, email: &str) -> Result<SearchResponse, SearchServiceError> {
        let rows = match self.grist.table_rows(&self.table_id).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch Grist records");
                Vec::new()
            }
        };
        if rows.is_empty() {
            return Err(SearchServiceError::EmptyTable);
        }
        tracing::info!(records = rows.len(), "fetched Grist table");

        if self.mapping.is_empty() {
            return Err(SearchServiceError::MappingUnavailable);
        }

        let display_columns = find_display_columns(&rows);
        // first entry is always the email column
        let email_column = display_columns[0].column.clone();
        let needle = email.to_lowercase();

        let matched: Vec<&Row> = rows
            .iter()
            .filter(|row| {
                row.get(&email_column)
                    .and_then(cell_text)
                    .is_some_and(|value| value.to_lowercase() == needle)
            })
            .collect();
        if matched.is_empty() {
            return Err(SearchServiceError::UnknownEmail(email.to_string()));
        }

        let matched = match find_aide_column(&collect_columns(&rows)) {
            Some(column) => {
                let kept: Vec<&Row> = matched
                    .iter()
                    .copied()
                    .filter(|row| row.get(&column) == Some(&Value::Bool(true)))
                    .collect();
                tracing::info!(
                    column = %column,
                    before = matched.len(),
                    after = kept.len(),
                    "filtered on the aid-request flag"
                );
                if kept.is_empty() {
                    return Err(SearchServiceError::NoAidRequest(email.to_string()));
                }
                kept
            }
            None => {
                tracing::warn!("no aid-request column found, filter skipped");
                matched
            }
        };

        let deduped = dedup_rows(matched);

        let mut results = Vec::with_capacity(deduped.len());
        for row in &deduped {
            let mut data = Map::new();
            for display_column in &display_columns {
                let text = row
                    .get(&display_column.column)
                    .and_then(cell_text)
                    .unwrap_or_default();
                data.insert(display_column.display.to_string(), Value::String(text));
            }
            let url = self.ds.prefilled_url(row, &self.mapping).await;
            results.push(ResultRow { data, url });
        }

        let columns = display_columns
            .iter()
            .map(|display_column| display_column.display.to_string())
            .collect();

        Ok(SearchResponse {
            total: results.len(),
            results,
            columns,
        })
    }
}

/// Drop exact duplicate rows, keeping first occurrences in order.
fn dedup_rows(rows: Vec<&Row>) -> Vec<&Row> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            let key = serde_json::to_string(row).unwrap_or_default();
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mk_row(entries: &[(&str, Value)]) -> Row {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_dedup_keeps_first_occurrences() {
        let a = mk_row(&[("email", json!("a@b.com")), ("id", json!(1))]);
        let b = mk_row(&[("email", json!("a@b.com")), ("id", json!(1))]);
        let c = mk_row(&[("email", json!("a@b.com")), ("id", json!(2))]);

        let deduped = dedup_rows(vec![&a, &b, &c]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].get("id"), Some(&json!(1)));
        assert_eq!(deduped[1].get("id"), Some(&json!(2)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SearchServiceError::EmptyTable.to_string(),
            "Aucune donnée trouvée dans la table"
        );
        assert_eq!(
            SearchServiceError::UnknownEmail("a@b.com".to_string()).to_string(),
            "Aucun enregistrement trouvé pour l'email: a@b.com"
        );
        assert_eq!(
            SearchServiceError::NoAidRequest("a@b.com".to_string()).to_string(),
            "Aucun enregistrement trouvé pour l'email a@b.com pour un dossier Aide DGER"
        );
    }
}
