//! Compound v2 Adapter
//!
//! Implementation of `LendingPort` for Compound v2 over an Ethereum
//! JSON-RPC node:
//! - Rate reads from cToken contracts
//! - Supply / borrow / repay transactions signed with a local key
//! - ERC-20 allowance management before supply and repay
//! - JSON-RPC error preservation for error reporting

mod adapter;
mod config;
mod contracts;
mod error;
mod markets;
mod mock;

pub use adapter::CompoundAdapter;
pub use config::CompoundConfig;
pub use error::{CompoundError, SignerClient};
pub use markets::{LEGACY_BORROW_TOKEN, LEGACY_RATES_TOKEN, LEGACY_SUPPLY_TOKEN, mainnet_markets};
pub use mock::{MOCK_WALLET, MockCompound, RecordedCall};
