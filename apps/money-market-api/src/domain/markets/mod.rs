//! Money Markets
//!
//! The set of markets the service can reach is fixed at process start. The
//! allow-list gate rejects any token outside that set before the lending
//! protocol is called.

mod allow_list;
mod amount;
mod market;

pub use allow_list::{TokenAllowList, UnsupportedToken};
pub use amount::TokenAmount;
pub use market::Market;
