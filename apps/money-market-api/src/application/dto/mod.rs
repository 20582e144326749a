//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for use case inputs and outputs.

mod rates_dto;
mod transfer_dto;

pub use rates_dto::MarketRatesDto;
pub use transfer_dto::{TransferCommand, TransferReceiptDto};
