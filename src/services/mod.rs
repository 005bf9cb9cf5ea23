pub mod engine;

pub mod market_service;
pub mod trading_service;
pub mod wallet_service;
