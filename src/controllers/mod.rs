use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::services::engine::EngineError;

pub mod home_controller;
pub mod marketplace_controller;
pub mod trading_controller;
pub mod wallet_controller;
pub mod realtime_controller;

pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub(crate) fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub(crate) fn hx_trigger_value(events: &[&str]) -> HeaderValue {
    // HX-Trigger expects JSON: {"evt":true,...}
    let mut s = String::from("{");
    for (i, ev) in events.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        s.push('"');
        s.push_str(ev);
        s.push_str("\":true");
    }
    s.push('}');
    HeaderValue::from_str(&s).unwrap_or_else(|_| HeaderValue::from_static("{}"))
}

pub(crate) fn unauthorized_snippet() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Html(r#"<div class="text-danger">Unauthorized</div>"#.to_string()),
    )
        .into_response()
}

pub(crate) fn engine_error(e: &EngineError) -> Response {
    tracing::error!("trading engine call failed: {}", e);
    (
        StatusCode::BAD_GATEWAY,
        Html(format!(r#"<div class="text-danger">{}</div>"#, esc(&e.to_string()))),
    )
        .into_response()
}

pub(crate) fn template_error(e: impl std::fmt::Display) -> Response {
    tracing::error!("template error: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("template error: {e}"))).into_response()
}
