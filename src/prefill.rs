use serde_json::{Map, Value};

use crate::config::CONFIG;
use crate::grist::{Row, cell_text};
use crate::mapping::FieldMapping;

const DS_API_BASE: &str = "https://www.demarches-simplifiees.fr/api/public/v1";

/// Client for the Démarches Simplifiées public prefill API.
///
/// URL generation never fails the surrounding search: every failure becomes
/// a French error string stored where the URL would have gone, and the
/// renderer shows those as muted text since they do not start with "http".
#[derive(Debug, Clone)]
pub struct DsClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
    demarche_id: Option<String>,
}

impl DsClient {
    pub fn new(api_base: &str, token: Option<String>, demarche_id: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            demarche_id,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            DS_API_BASE,
            CONFIG.ds_api_token.clone(),
            CONFIG.demarche_id.clone(),
        )
    }

    /// Create a prefilled dossier for one matched row and return its URL,
    /// or the error string taking its place.
    pub async fn prefilled_url(&self, row: &Row, mapping: &FieldMapping) -> String {
        let Some(token) = self.token.as_deref() else {
            return "Erreur: Token API manquant".to_string();
        };
        if mapping.is_empty() {
            return "Erreur: Mapping des champs non disponible".to_string();
        }
        let Some(demarche_id) = self.demarche_id.as_deref() else {
            return "Erreur: Identifiant de démarche manquant".to_string();
        };

        let mapped = map_row_fields(row, mapping);
        let payload = clean_prefill_data(&mapped);
        tracing::debug!(fields = payload.len(), "prefill payload ready");

        let url = format!("{}/demarches/{}/dossiers", self.api_base, demarche_id);
        let response = match self.http.post(&url).bearer_auth(token).json(&payload).send().await {
            Ok(response) => response,
            Err(err) => return format!("Erreur: {err}"),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return format!("Erreur: {err}"),
        };
        tracing::debug!(status = %status, "DS API answered");

        if status == reqwest::StatusCode::CREATED {
            serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| {
                    value
                        .get("dossier_url")
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                })
                .unwrap_or_else(|| "URL non disponible".to_string())
        } else {
            format!("Erreur API: {} - {}", status.as_u16(), body)
        }
    }
}

/// Rename the row's columns to their DS champ keys. Unmapped columns are
/// dropped.
pub fn map_row_fields(row: &Row, mapping: &FieldMapping) -> Map<String, Value> {
    let mut mapped = Map::new();
    for (column, value) in row {
        match mapping.get(column) {
            Some(champ_id) => {
                mapped.insert(format!("champ_{champ_id}"), value.clone());
            }
            None => tracing::debug!(column = %column, "column has no DS mapping"),
        }
    }
    mapped
}

/// Normalize the payload for the DS API.
///
/// Null and empty values are dropped. Arrays stay arrays, each element
/// cleaned. A scalar whose cleaned text still holds commas is re-parsed as a
/// multi-value field: some upstreams serialize those as one joined string.
pub fn clean_prefill_data(data: &Map<String, Value>) -> Map<String, Value> {
    let mut cleaned = Map::new();

    for (key, value) in data {
        match value {
            Value::Null => continue,
            Value::Array(items) => {
                let values: Vec<Value> = items
                    .iter()
                    .filter_map(clean_scalar)
                    .map(Value::String)
                    .collect();
                if !values.is_empty() {
                    cleaned.insert(key.clone(), Value::Array(values));
                }
            }
            other => {
                let Some(text) = clean_scalar(other) else {
                    continue;
                };
                let parts: Vec<String> = text
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_owned)
                    .collect();
                if text.contains(',') && parts.len() > 1 {
                    cleaned.insert(key.clone(), Value::from(parts));
                } else {
                    cleaned.insert(key.clone(), Value::String(text));
                }
            }
        }
    }

    cleaned
}

/// One value: newlines become spaces, whitespace runs collapse, empties
/// disappear.
fn clean_scalar(value: &Value) -> Option<String> {
    let text = cell_text(value)?;
    let text = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() { None } else { Some(text) }
}
