//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`rates`]: Per-block interest rate annualization
//! - [`markets`]: Supported money markets, the token allow-list and token amounts

pub mod markets;
pub mod rates;
