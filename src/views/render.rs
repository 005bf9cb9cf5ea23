use serde_json::json;

use crate::{models::CurrentActor, AppState};

pub fn render_full(
    state: &AppState,
    title: &str,
    body_html: String,
    who: Option<&CurrentActor>,
) -> Result<String, String> {
    let (is_logged_in, user_json) = match who {
        Some(c) => (
            true,
            json!({
                "id": c.actor.user_id,
                "is_admin": c.actor.is_admin(),
            }),
        ),
        None => (false, serde_json::Value::Null),
    };

    let ctx = json!({
        "title": title,
        "body": body_html,
        "is_logged_in": is_logged_in,
        "user": user_json,
    });

    state
        .hbs
        .render("layouts/base", &ctx)
        .map_err(|e| e.to_string())
}
