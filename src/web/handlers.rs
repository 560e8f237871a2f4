//! HTTP request handlers

use super::state::AppState;
use crate::locales::negotiate_language;
use crate::results::{BookCandidate, FormFill, ProviderState, SessionView, Timing};
use crate::search::MetaQuery;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;

/// Query parameters for the aggregate search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Identifier of the book being edited
    pub book_id: String,
    /// Title keyword
    pub keyword: Option<String>,
    /// Selected providers (comma-separated); all enabled when absent
    pub providers: Option<String>,
    /// Client session token: a new search with the same token supersedes
    /// the previous one
    pub session: Option<String>,
    /// Output format ("json" or HTML)
    pub format: Option<String>,
}

/// Query parameters for the single-provider endpoint
#[derive(Debug, Deserialize)]
pub struct MetadataParams {
    /// Title keyword override
    pub title: Option<String>,
}

/// Localized dialog messages
#[derive(Debug, Serialize)]
pub struct Messages {
    pub loading: String,
    pub no_result: String,
    pub search_error: String,
    pub search: String,
}

/// Search response for JSON format
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub book_id: String,
    pub keyword: String,
    #[serde(flatten)]
    pub view: SessionView,
    pub timings: Vec<Timing>,
}

/// One checkbox on the dialog
#[derive(Debug, Serialize)]
pub struct ProviderOption {
    pub name: String,
    pub display_name: String,
    pub checked: bool,
}

fn messages(state: &AppState, headers: &HeaderMap) -> Messages {
    let negotiated = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(negotiate_language);
    let lang = negotiated.unwrap_or(state.settings.ui.default_locale.as_str());

    let lookup = |key: &str| {
        state
            .translations
            .get(lang, key)
            .unwrap_or(key)
            .to_string()
    };

    Messages {
        loading: lookup("loading"),
        no_result: lookup("no_result"),
        search_error: lookup("search_error"),
        search: lookup("search"),
    }
}

fn provider_options(state: &AppState) -> Vec<ProviderOption> {
    state
        .registry
        .names()
        .into_iter()
        .map(|name| {
            let config = state.registry.get_config(name);
            ProviderOption {
                name: name.to_string(),
                display_name: config
                    .and_then(|c| c.display_name.clone())
                    .unwrap_or_else(|| name.to_string()),
                checked: config.map(|c| !c.disabled).unwrap_or(true),
            }
        })
        .collect()
}

/// Dialog page handler
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("providers", &provider_options(&state));
    ctx.insert("messages", &messages(&state, &headers));

    match state.templates.render_with_context("index.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Aggregate search handler: fan out to the selected providers and render
/// the settled session.
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let providers: Vec<String> = match params.providers {
        Some(ref list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => state
            .registry
            .enabled_names()
            .into_iter()
            .map(String::from)
            .collect(),
    };

    let keyword = params.keyword.unwrap_or_default();
    let mut query = MetaQuery::new(&params.book_id, &keyword).with_providers(providers);
    if let Some(token) = params.session {
        query = query.with_session_token(token);
    }

    let session = state.search.execute(&query).await;
    let view = session.view();

    if params.format.as_deref() == Some("json") {
        let response = SearchResponse {
            book_id: params.book_id,
            keyword,
            view,
            timings: session.timings(),
        };
        return Json(response).into_response();
    }

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("book_id", &params.book_id);
    ctx.insert("keyword", &keyword);
    ctx.insert("view", &view);
    ctx.insert("messages", &messages(&state, &headers));

    match state.templates.render_with_context("results.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Single-provider endpoint: JSON array of candidates, as the edit dialog
/// consumes it.
pub async fn metadata(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((provider, book_id)): Path<(String, String)>,
    Query(params): Query<MetadataParams>,
) -> Response {
    if !state.registry.contains(&provider) {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown provider: {}", provider) })),
        )
            .into_response();
    }

    let keyword = params.title.unwrap_or_default();
    let query = MetaQuery::new(&book_id, &keyword).with_provider(provider.clone());

    let session = state.search.execute(&query).await;

    match session.state_of(&provider) {
        Some(ProviderState::Succeeded(candidates)) => Json(candidates).into_response(),
        Some(ProviderState::Failed(error)) => {
            let msg = messages(&state, &headers).search_error;
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": format!("{}: {}", msg, error) })),
            )
                .into_response()
        }
        _ => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": "provider did not settle" })),
        )
            .into_response(),
    }
}

/// Form population handler: map a chosen candidate onto the edit form fields
pub async fn apply_form(Json(candidate): Json<BookCandidate>) -> impl IntoResponse {
    Json(FormFill::from_candidate(&candidate))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
