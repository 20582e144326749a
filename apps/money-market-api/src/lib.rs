// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Money Market API - Rust Core Library
//!
//! HTTP/JSON service for Compound v2 money markets: it quotes supply and
//! borrow APYs and submits supply / borrow / repay transactions for an
//! allow-listed set of tokens.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: pure logic with no I/O
//!   - `rates`: per-block rate annualization, `RateQuote`
//!   - `markets`: `Market`, `TokenAllowList`, `TokenAmount` unit conversion
//!
//! - **Application**: use cases and port definitions
//!   - `ports`: `LendingPort` (the lending protocol collaborator), error normalization
//!   - `use_cases`: `QueryRatesUseCase`, `TransferUseCase`
//!   - `dto`: data transfer objects for API boundaries
//!
//! - **Infrastructure**: adapters
//!   - `compound`: ethers-based Compound v2 adapter and market registry
//!   - `http`: axum REST controller
//!
//! - **Config / Observability**: YAML + environment configuration, tracing and metrics.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Logging and metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::markets::{Market, TokenAllowList, TokenAmount, UnsupportedToken};
pub use domain::rates::{BlockCadence, RateQuote, annualize};

// Application re-exports
pub use application::error::ApplicationError;
pub use application::ports::{
    LendingError, LendingErrorKind, LendingOperation, LendingPort, TransactionOutcome,
    normalize_error_message,
};
pub use application::use_cases::{QueryRatesUseCase, TransferUseCase};

// Infrastructure re-exports
pub use infrastructure::compound::{CompoundAdapter, CompoundConfig, CompoundError, MockCompound};
pub use infrastructure::http::{AppState, create_router};
