use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    models::{Actor, CurrentActor},
    AppState,
};

/// Claims minted by the marketplace auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    // user id
    pub sub: String,
    // raw role strings, any spelling ("ADMIN", "ROLE_USER", ...)
    #[serde(default)]
    pub roles: Vec<String>,
    // expiry (unix timestamp seconds)
    pub exp: usize,
}

fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    for part in raw.split(';') {
        let part = part.trim();
        let mut it = part.splitn(2, '=');
        let k = it.next()?.trim();
        let v = it.next()?.trim();
        if k == name {
            return Some(v.to_string());
        }
    }
    None
}

fn get_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim().to_string())
    } else {
        None
    }
}

/// Decodes and validates a token into the actor it speaks for.
pub fn actor_from_token(token: &str, secret: &str) -> Option<CurrentActor> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| tracing::debug!("rejected token: {}", e))
        .ok()?;

    if data.claims.sub.trim().is_empty() {
        return None;
    }

    Some(CurrentActor {
        actor: Actor::new(data.claims.sub, &data.claims.roles),
        token: token.to_string(),
    })
}

pub async fn inject_current_actor(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = get_bearer(req.headers())
        .or_else(|| get_cookie(req.headers(), &state.settings.jwt_cookie_name));

    if let Some(token) = token {
        if let Some(current) = actor_from_token(&token, &state.settings.jwt_secret) {
            // Store actor in request extensions so handlers can access it
            req.extensions_mut().insert(current);
        }
    }

    next.run(req).await
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn is_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/event-stream"))
        .unwrap_or(false)
}

// chart data endpoints answer with JSON, never a login page
fn is_json_path(path: &str) -> bool {
    path.ends_with("/depth") || path.ends_with("/price-history")
}

fn is_public_path(path: &str) -> bool {
    path == "/"
        || path == "/health"
        || path == "/favicon.ico"
        || path.starts_with("/static/")
}

pub async fn require_auth(
    State(state): State<AppState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if is_public_path(path) {
        return next.run(req).await;
    }

    // inject_current_actor already ran => authenticated
    if req.extensions().get::<CurrentActor>().is_some() {
        return next.run(req).await;
    }

    // Not signed in:
    // - API / SSE: 401
    // - HTMX: force full redirect to the login screen
    // - Normal: redirect
    if is_event_stream(req.headers()) || is_json_path(path) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let login = state.settings.login_url.as_str();

    if is_htmx(req.headers()) {
        let mut headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(login) {
            headers.insert("HX-Redirect", v);
        }
        return (StatusCode::OK, headers, Html("".to_string())).into_response();
    }

    Redirect::to(login).into_response()
}
