//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod query_rates;
mod transfer;

pub use query_rates::QueryRatesUseCase;
pub use transfer::TransferUseCase;
