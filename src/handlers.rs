use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::{QueryParams, WordTable};
use crate::normalize::is_valid_token;
use crate::record::OccurrenceRecord;

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<WordTable>,
    pub max_page_size: usize,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct WordsQuery {
    pub prefix: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Serialize)]
pub struct WordsResponse {
    prefix: String,
    page: usize,
    page_size: usize,
    total: usize,
    has_more: bool,
    items: Vec<OccurrenceRecord>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/words", get(words))
        .route("/v1/words/{word}", get(word_entry))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn words(
    State(state): State<AppState>,
    Query(params): Query<WordsQuery>,
) -> Result<Response, ApiError> {
    let prefix = params.prefix.unwrap_or_default().to_ascii_lowercase();
    if !prefix.is_empty() && !is_valid_token(&prefix) {
        return Err(ApiError::bad_request(format!(
            "invalid prefix {prefix:?}: only a-z, '-' and apostrophes are allowed"
        )));
    }

    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::bad_request("page must be >= 1"));
    }
    let mut page_size = params.page_size.unwrap_or(50);
    if page_size == 0 {
        return Err(ApiError::bad_request("page_size must be >= 1"));
    }
    if page_size > state.max_page_size {
        page_size = state.max_page_size;
    }

    let result = state.table.query(QueryParams {
        prefix: &prefix,
        page,
        page_size,
    });

    let response = WordsResponse {
        prefix,
        page,
        page_size,
        total: result.total,
        has_more: result.has_more,
        items: result.items,
    };
    Ok(cached(&state, Json(response)))
}

async fn word_entry(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Response, ApiError> {
    let word = word.to_ascii_lowercase();
    let record = state
        .table
        .get(&word)
        .ok_or_else(|| ApiError::NotFound(word.clone()))?;
    Ok(cached(&state, Json(record.clone())))
}

fn cached(state: &AppState, body: impl IntoResponse) -> Response {
    if state.disable_cache {
        return body.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        body,
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("word not found: {0}")]
    NotFound(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NotFound(_) => {
                let body = Json(ErrorResponse {
                    error: self.to_string(),
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
        }
    }
}
