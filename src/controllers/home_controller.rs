use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::{models::CurrentActor, render, AppState};

use super::{is_htmx, template_error};

fn page(state: &AppState, headers: &HeaderMap, who: Option<&CurrentActor>, name: &str, title: &str, status: StatusCode) -> Response {
    let body = match state.hbs.render(name, &json!({})) {
        Ok(b) => b,
        Err(e) => return template_error(e),
    };

    if is_htmx(headers) {
        return (status, Html(body)).into_response();
    }

    match render::render_full(state, title, body, who) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(e) => template_error(e),
    }
}

pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
    who: Option<Extension<CurrentActor>>,
) -> Response {
    let who_ref = who.as_ref().map(|Extension(c)| c);
    page(&state, &headers, who_ref, "pages/home", "Carbon Market", StatusCode::OK)
}

pub async fn not_found(
    State(state): State<AppState>,
    headers: HeaderMap,
    who: Option<Extension<CurrentActor>>,
) -> Response {
    let who_ref = who.as_ref().map(|Extension(c)| c);
    page(&state, &headers, who_ref, "pages/not_found", "404", StatusCode::NOT_FOUND)
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Html("ok".to_string()))
}
