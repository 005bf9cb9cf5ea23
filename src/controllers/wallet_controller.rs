use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{models::CurrentActor, services::wallet_service, AppState};

use super::{engine_error, template_error, unauthorized_snippet};

// GET /wallet (HTMX partial)
pub async fn get_wallet_panel(State(state): State<AppState>, who: Option<Extension<CurrentActor>>) -> Response {
    let Some(Extension(who)) = who else {
        return unauthorized_snippet();
    };

    let view = match wallet_service::get_wallet_view(&state, &who).await {
        Ok(v) => v,
        Err(e) => return engine_error(&e),
    };

    match state.hbs.render("partials/wallet_panel", &view) {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => template_error(e),
    }
}
