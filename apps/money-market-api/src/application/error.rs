//! Application error type.

use thiserror::Error;

use crate::application::ports::LendingError;
use crate::domain::markets::UnsupportedToken;

/// Errors returned by use cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// The requested token is outside the allow-list. Raised before any
    /// external call.
    #[error(transparent)]
    UnsupportedToken(#[from] UnsupportedToken),

    /// The lending protocol call failed.
    #[error(transparent)]
    Lending(#[from] LendingError),
}

impl ApplicationError {
    /// Whether the caller sent an invalid request (as opposed to an
    /// upstream failure).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::UnsupportedToken(_))
    }
}
