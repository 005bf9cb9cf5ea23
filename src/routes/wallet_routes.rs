use axum::{Router, routing::get};
use crate::{AppState, controllers::wallet_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/wallet", get(wallet_controller::get_wallet_panel))
}
