use std::collections::HashSet;

use crate::grist::Row;

/// A grist column elected for display, with the label shown in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayColumn {
    pub column: String,
    pub display: &'static str,
}

const EMAIL_PATTERNS: &[&str] = &["email", "mail", "e-mail", "e_mail", "courriel"];

const DOSSIER_PATTERNS: &[&str] = &[
    "numero_dossier",
    "numéro_dossier",
    "numero dossier",
    "numéro dossier",
    "dossier_number",
    "dossier number",
    "dossier_num",
    "dossier num",
    "num_dossier",
    "num dossier",
    "id_dossier",
    "id dossier",
];

const PAYS_NAMES: &[&str] = &["pays", "country", "pays_", "country_"];

/// Column names across all rows, first appearance wins.
pub fn collect_columns(rows: &[Row]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for name in row.keys() {
            if seen.insert(name.clone()) {
                columns.push(name.clone());
            }
        }
    }
    columns
}

/// Elect the four displayed columns from whatever the table actually calls
/// them. Categories that match nothing fall back to conventional names.
pub fn find_display_columns(rows: &[Row]) -> Vec<DisplayColumn> {
    let columns = collect_columns(rows);

    let mut email_column = None;
    let mut dossier_column = None;
    let mut nom_column = None;
    let mut pays_column = None;

    for name in &columns {
        let lower = name.to_lowercase();

        if EMAIL_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
            tracing::debug!(column = %name, "email column found");
            email_column = Some(name.clone());
        } else if DOSSIER_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
            tracing::debug!(column = %name, "dossier column found");
            dossier_column = Some(name.clone());
        } else if lower == "nom_maj_" || lower == "nom_maj" {
            tracing::debug!(column = %name, "name column found");
            nom_column = Some(name.clone());
        } else if PAYS_NAMES.contains(&lower.as_str()) {
            tracing::debug!(column = %name, "country column found");
            pays_column = Some(name.clone());
        }
    }

    let email_column = email_column.unwrap_or_else(|| {
        tracing::warn!("no email column found, falling back to 'email'");
        "email".to_string()
    });
    let dossier_column = dossier_column.unwrap_or_else(|| {
        tracing::warn!("no dossier column found, falling back to 'dossier_number'");
        "dossier_number".to_string()
    });
    let nom_column = nom_column.unwrap_or_else(|| {
        tracing::warn!("no name column found, falling back to 'Nom_maj_'");
        "Nom_maj_".to_string()
    });
    let pays_column = pays_column.unwrap_or_else(|| {
        tracing::warn!("no country column found, falling back to 'Pays'");
        "Pays".to_string()
    });

    vec![
        DisplayColumn {
            column: email_column,
            display: "Email",
        },
        DisplayColumn {
            column: dossier_column,
            display: "Numéro de dossier",
        },
        DisplayColumn {
            column: nom_column,
            display: "Nom",
        },
        DisplayColumn {
            column: pays_column,
            display: "Pays",
        },
    ]
}

/// The boolean column gating rows on whether DGER aid was requested.
pub fn find_aide_column(columns: &[String]) -> Option<String> {
    columns
        .iter()
        .find(|name| {
            let lower = name.to_lowercase();
            lower == "aide_dger_demandee" || lower == "aide_dger_demandée"
        })
        .cloned()
}
