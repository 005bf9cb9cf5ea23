use axum::{Router, routing::{get, post}};

use crate::{AppState, controllers::trading_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/trade/band", get(trading_controller::get_price_band))
        .route("/trade/orders", post(trading_controller::post_place_order))
        .route("/trade/orders/:id/cancel", post(trading_controller::post_cancel_order))
}
