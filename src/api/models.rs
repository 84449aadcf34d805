use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ResultRow>,
    pub columns: Vec<String>,
    pub total: usize,
}

/// One matched record: the displayed cells keyed by column name, plus the
/// generated dossier URL (or the error string that took its place).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub data: Map<String, Value>,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
