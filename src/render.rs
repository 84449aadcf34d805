use std::fmt::Write;

use crate::api::models::SearchResponse;
use crate::grist::cell_text;
use crate::mapping::MappingStatus;

/// What the results section displays: the stats line and the markup below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResults {
    pub stats: String,
    pub content: String,
}

/// Entity-encode untrusted text before it lands in markup.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Turn a search response into the results section content.
///
/// Empty result sets get a warning notice instead of a table. Otherwise one
/// header cell per column plus the fixed link column, one body row per
/// result in input order, every cell escaped. The URL cell is an anchor only
/// when the value actually looks like a URL; error strings stored in the
/// `url` field come out as muted text.
pub fn render_results(response: &SearchResponse) -> RenderedResults {
    let stats = format!("{} résultat(s) trouvé(s)", response.total);

    if response.results.is_empty() {
        return RenderedResults {
            stats,
            content: "<div class=\"fr-alert fr-alert--warning\">\
                      <p>Aucun résultat trouvé pour cette adresse email.</p></div>"
                .to_string(),
        };
    }

    let mut html = String::from("<table class=\"results-table\"><thead><tr>");
    for column in &response.columns {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("<th>Lien généré</th></tr></thead><tbody>");

    for result in &response.results {
        html.push_str("<tr>");
        for column in &response.columns {
            let value = result
                .data
                .get(column)
                .and_then(cell_text)
                .unwrap_or_default();
            let _ = write!(html, "<td>{}</td>", escape_html(&value));
        }

        html.push_str("<td class=\"url-cell\">");
        if result.url.starts_with("http") {
            let _ = write!(
                html,
                "<a href=\"{}\" target=\"_blank\" class=\"url-link\">📄 Accéder au dossier</a>",
                escape_html(&result.url)
            );
        } else {
            let _ = write!(
                html,
                "<span class=\"fr-text--sm url-error\">{}</span>",
                escape_html(&result.url)
            );
        }
        html.push_str("</td></tr>");
    }

    html.push_str("</tbody></table>");
    RenderedResults {
        stats,
        content: html,
    }
}

/// The search page itself, popup included.
pub fn render_index(status: &MappingStatus) -> String {
    let popup = if status.loaded {
        let filename = status.filename.as_deref().unwrap_or("configuration");
        format!(
            "<div id=\"configPopup\" class=\"config-popup\">\
             <p>✅ Mapping chargé: {} ({} champ(s) mappé(s))</p></div>",
            escape_html(filename),
            status.mappings_count
        )
    } else {
        "<div id=\"configPopup\" class=\"config-popup config-popup--error\">\
         <p>❌ Mapping des champs non chargé. Vérifiez CONFIG_FILE_PATH.</p></div>"
            .to_string()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Recherche de dossiers - Démarches Simplifiées</title>
  <style>
    .config-popup {{ position: fixed; top: 1rem; right: 1rem; padding: 0.5rem 1rem;
                     background: #eeeeee; }}
    .config-popup--error {{ background: #ffe9e9; }}
    .url-error {{ color: #ce0500; }}
  </style>
</head>
<body>
  {popup}
  <main class="fr-container">
    <h1>Recherche de dossiers</h1>
    <form id="searchForm" method="post" action="/search">
      <label class="fr-label" for="email">Adresse email</label>
      <input class="fr-input" type="email" id="email" name="email" required>
      <button class="fr-btn" type="submit" id="searchBtn">Rechercher</button>
    </form>
    <div id="loading" style="display: none;"><p>Recherche en cours…</p></div>
    <div id="errorMessage" class="fr-alert fr-alert--error" style="display: none;">
      <p id="errorText"></p>
    </div>
    <section id="resultsSection" style="display: none;">
      <p id="stats"></p>
      <div id="resultsContent"></div>
    </section>
  </main>
</body>
</html>
"#
    )
}
