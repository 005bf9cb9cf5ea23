pub mod lenient;
pub mod order;
pub mod trade;
pub mod wallet;
pub mod actor;

pub use order::{NewOrder, Order, OrderStatus, Side};
pub use trade::Trade;
pub use wallet::Wallet;
pub use actor::{Actor, CurrentActor, Role};
