use axum::{Form, Json, extract::State, http::StatusCode, response::Html};
use std::sync::Arc;

use crate::render;
use crate::search::{SearchService, SearchServiceError};

use super::models::{ErrorBody, SearchRequest, SearchResponse};

pub async fn index_handler(State(service): State<Arc<SearchService>>) -> Html<String> {
    Html(render::render_index(&service.mapping().status()))
}

pub async fn search_handler(
    State(service): State<Arc<SearchService>>,
    Form(request): Form<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorBody>)> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Email requis"));
    }

    let response = service.search(email).await.map_err(|err| {
        let status = match err {
            SearchServiceError::MappingUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::NOT_FOUND,
        };
        error_response(status, &err.to_string())
    })?;

    Ok(Json(response))
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}
