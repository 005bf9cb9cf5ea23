use std::{env, str::FromStr, time::Duration};

use rust_decimal::Decimal;

use crate::orderbook::price_band::DEFAULT_TOLERANCE;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    // trading engine / order-management service
    pub engine_base_url: String,
    pub engine_timeout: Duration,

    pub jwt_secret: String,
    pub jwt_cookie_name: String,
    // sign-in lives in the external auth screens
    pub login_url: String,

    pub price_band_tolerance: Decimal,
    pub events_capacity: usize,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let engine_base_url = env::var("ENGINE_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8080/api".to_string());

    let engine_timeout = env::var("ENGINE_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(10));

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-dev-secret".to_string());
    let jwt_cookie_name = env::var("JWT_COOKIE_NAME").unwrap_or_else(|_| "auth".to_string());
    let login_url = env::var("LOGIN_URL").unwrap_or_else(|_| "/login".to_string());

    let price_band_tolerance = env::var("PRICE_BAND_TOLERANCE")
        .ok()
        .and_then(|s| parse_tolerance(&s))
        .unwrap_or(DEFAULT_TOLERANCE);

    let events_capacity = env::var("EVENTS_CAPACITY")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(64);

    Settings {
        host,
        port,
        engine_base_url: engine_base_url.trim_end_matches('/').to_string(),
        engine_timeout,
        jwt_secret,
        jwt_cookie_name,
        login_url,
        price_band_tolerance,
        events_capacity,
    }
}

/// Accepts a fraction in `[0, 1)`; anything else is rejected.
pub fn parse_tolerance(raw: &str) -> Option<Decimal> {
    let t = Decimal::from_str(raw.trim()).ok()?;
    if t.is_sign_negative() || t >= Decimal::ONE {
        tracing::warn!("ignoring PRICE_BAND_TOLERANCE={raw}: must be in [0, 1)");
        return None;
    }
    Some(t)
}
