use std::collections::HashMap;

use axum::{Form, Json, Router, http::StatusCode, routing::post};
use serde_json::json;

use prefill::client::{GENERIC_SEARCH_ERROR, SearchClient};
use prefill::ui::SearchPage;

mod test_helpers {
    use super::*;

    /// Serve a router on an ephemeral port and return its base URL.
    pub async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A page wired to a stub `/search` endpoint.
    pub async fn page_against(router: Router) -> SearchPage {
        let base_url = spawn(router).await;
        SearchPage::new(SearchClient::new(&base_url))
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_successful_submission_renders_one_linked_row() {
    let router = Router::new().route(
        "/search",
        post(|| async {
            Json(json!({
                "total": 1,
                "columns": ["Name"],
                "results": [{"data": {"Name": "X"}, "url": "https://x"}]
            }))
        }),
    );
    let mut page = page_against(router).await;

    page.submit("a@b.com").await;

    let results = page.state.results.as_ref().expect("results rendered");
    assert_eq!(results.stats, "1 résultat(s) trouvé(s)");
    // header row + one body row
    assert_eq!(results.content.matches("<tr>").count(), 2);
    assert!(results.content.contains("<a href=\"https://x\""));
    assert!(page.state.error.is_none());
    assert!(!page.state.loading);
    assert!(!page.state.button_disabled);
}

#[tokio::test]
async fn test_error_response_shows_its_message() {
    let router = Router::new().route(
        "/search",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid email"})),
            )
        }),
    );
    let mut page = page_against(router).await;

    page.submit("a@b.com").await;

    assert_eq!(page.state.error.as_deref(), Some("Invalid email"));
    assert!(page.state.results.is_none());
    assert!(!page.state.loading);
    assert!(!page.state.button_disabled);
}

#[tokio::test]
async fn test_error_without_message_falls_back_to_generic_text() {
    let router = Router::new().route(
        "/search",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))) }),
    );
    let mut page = page_against(router).await;

    page.submit("a@b.com").await;

    assert_eq!(page.state.error.as_deref(), Some(GENERIC_SEARCH_ERROR));
}

#[tokio::test]
async fn test_malformed_body_surfaces_a_parse_error() {
    let router = Router::new().route("/search", post(|| async { "pas du json" }));
    let mut page = page_against(router).await;

    page.submit("a@b.com").await;

    let message = page.state.error.as_deref().expect("error surfaced");
    assert!(!message.is_empty());
    assert!(page.state.results.is_none());
    assert!(!page.state.loading);
    assert!(!page.state.button_disabled);
}

#[tokio::test]
async fn test_transport_failure_surfaces_its_message() {
    // nothing listens here
    let mut page = SearchPage::new(SearchClient::new("http://127.0.0.1:1"));

    page.submit("a@b.com").await;

    assert!(page.state.error.is_some());
    assert!(page.state.results.is_none());
    assert!(!page.state.loading);
    assert!(!page.state.button_disabled);
}

#[tokio::test]
async fn test_submission_is_form_encoded_with_an_email_field() {
    // echo the submitted field back through the error banner
    let router = Router::new().route(
        "/search",
        post(|Form(form): Form<HashMap<String, String>>| async move {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": form.get("email").cloned().unwrap_or_default()})),
            )
        }),
    );
    let mut page = page_against(router).await;

    page.submit("qui@exemple.fr").await;

    assert_eq!(page.state.error.as_deref(), Some("qui@exemple.fr"));
}

#[tokio::test]
async fn test_empty_result_set_shows_the_warning_notice() {
    let router = Router::new().route(
        "/search",
        post(|| async {
            Json(json!({"total": 0, "columns": ["Email"], "results": []}))
        }),
    );
    let mut page = page_against(router).await;

    page.submit("a@b.com").await;

    let results = page.state.results.as_ref().expect("results section shown");
    assert_eq!(results.stats, "0 résultat(s) trouvé(s)");
    assert!(
        results
            .content
            .contains("Aucun résultat trouvé pour cette adresse email.")
    );
    assert!(!results.content.contains("<table"));
}
