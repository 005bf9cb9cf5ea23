use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::models::{NewOrder, Order, Trade, Wallet};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("trading engine unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("unexpected response from trading engine: {0}")]
    Decode(#[source] reqwest::Error),
}

impl EngineError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            EngineError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the external trading engine / order-management service.
///
/// Every call forwards the caller's bearer token; the engine decides what the
/// caller is allowed to see and do.
#[derive(Clone)]
pub struct EngineClient {
    http: Client,
    base_url: String,
}

impl EngineClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::warn!("engine http client without timeout: {}", e);
            Client::new()
        });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token)
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, EngineError> {
        let res = req.send().await.map_err(EngineError::Transport)?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(EngineError::Rejected {
                status,
                message: rejection_message(status, &body),
            });
        }

        Ok(res)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, EngineError> {
        let res = self.send(self.request(Method::GET, path, token)).await?;
        res.json::<T>().await.map_err(EngineError::Decode)
    }

    /// Open-order snapshot across all users (book views).
    pub async fn open_orders(&self, token: &str) -> Result<Vec<Order>, EngineError> {
        self.get_json("/marketplace/orders", token).await
    }

    /// The caller's own orders, any status (ownership views).
    pub async fn my_orders(&self, token: &str) -> Result<Vec<Order>, EngineError> {
        self.get_json("/marketplace/orders/my", token).await
    }

    pub async fn recent_trades(&self, token: &str) -> Result<Vec<Trade>, EngineError> {
        self.get_json("/marketplace/trades", token).await
    }

    /// Every executed trade, for the price chart.
    pub async fn price_history(&self, token: &str) -> Result<Vec<Trade>, EngineError> {
        self.get_json("/marketplace/price-history", token).await
    }

    pub async fn wallet(&self, token: &str) -> Result<Wallet, EngineError> {
        self.get_json("/wallet", token).await
    }

    pub async fn submit_order(&self, token: &str, order: &NewOrder) -> Result<Order, EngineError> {
        let req = self
            .request(Method::POST, "/marketplace/orders", token)
            .json(order);
        let res = self.send(req).await?;
        res.json::<Order>().await.map_err(EngineError::Decode)
    }

    /// Idempotent on the engine side for already-terminal orders.
    pub async fn cancel_order(&self, token: &str, order_id: &str) -> Result<(), EngineError> {
        let path = format!("/marketplace/orders/{order_id}/cancel");
        self.send(self.request(Method::PUT, &path, token)).await?;
        Ok(())
    }
}

/// The engine answers with either plain text or `{"message": "..."}`.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(m) = v.get("message").and_then(|m| m.as_str()) {
            return m.to_string();
        }
    }

    if body.is_empty() {
        format!("trading engine returned {status}")
    } else {
        body.to_string()
    }
}
