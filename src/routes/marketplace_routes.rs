use axum::{Router, routing::{get, post}};

use crate::{AppState, controllers::marketplace_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/marketplace", get(marketplace_controller::get_marketplace))
        .route("/marketplace/orders", get(marketplace_controller::get_order_table))
        .route("/marketplace/depth", get(marketplace_controller::get_depth))
        .route("/marketplace/stats", get(marketplace_controller::get_stats_panel))
        .route("/marketplace/price-history", get(marketplace_controller::get_price_history))
        .route("/marketplace/orders/:id/trade", post(marketplace_controller::post_trade_against))
}
