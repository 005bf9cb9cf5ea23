//! Library entrypoint for the carbon market client.
//!
//! The order-book core lives in [`orderbook`] and has no I/O. Everything else
//! is the web shell around it; it is exposed here so integration tests under
//! `tests/` can build routers and state directly.

pub mod config;
pub mod models;
pub mod orderbook;

// Kept at crate root so handlers can say `crate::auth`, `crate::render`, `crate::templates`.
#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

#[path = "views/render.rs"]
pub mod render;
#[path = "views/templates.rs"]
pub mod templates;

pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub settings: config::Settings,
    pub engine: services::engine::EngineClient,
    pub events_tx: tokio::sync::broadcast::Sender<String>,
}

impl AppState {
    pub fn new(settings: config::Settings) -> Self {
        let engine = services::engine::EngineClient::new(
            settings.engine_base_url.clone(),
            settings.engine_timeout,
        );
        let (events_tx, _events_rx) = tokio::sync::broadcast::channel::<String>(settings.events_capacity);

        AppState {
            hbs: templates::build_handlebars(),
            settings,
            engine,
            events_tx,
        }
    }

    /// Fire-and-forget refresh signal for SSE subscribers.
    pub fn publish(&self, event: &str) {
        let _ = self.events_tx.send(event.to_string());
    }
}
