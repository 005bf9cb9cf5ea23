use serde::Serialize;

use crate::{
    models::{CurrentActor, Wallet},
    AppState,
};

use super::{engine::EngineError, market_service::fmt2};

#[derive(Debug, Clone, Serialize)]
pub struct WalletView {
    pub balance: String,
    pub money_locked: String,
    pub credits: String,
    pub credits_locked: String,
    pub total_funds: String,
    pub total_credits: String,
}

impl From<&Wallet> for WalletView {
    fn from(w: &Wallet) -> Self {
        WalletView {
            balance: fmt2(w.balance.unwrap_or_default()),
            money_locked: fmt2(w.money_locked.unwrap_or_default()),
            credits: fmt2(w.carbon_credit_balance.unwrap_or_default()),
            credits_locked: fmt2(w.credit_locked.unwrap_or_default()),
            total_funds: fmt2(w.total_funds()),
            total_credits: fmt2(w.total_credits()),
        }
    }
}

pub async fn get_wallet_view(state: &AppState, who: &CurrentActor) -> Result<WalletView, EngineError> {
    let wallet = state.engine.wallet(&who.token).await?;
    Ok(WalletView::from(&wallet))
}
