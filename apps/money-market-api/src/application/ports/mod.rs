//! Application Ports (Driven)
//!
//! Ports define how the application uses external systems.

mod lending_port;

#[cfg(test)]
pub use lending_port::MockLendingPort;
pub use lending_port::{
    LendingError, LendingErrorKind, LendingOperation, LendingPort, RpcErrorDetail,
    TransactionOutcome, normalize_error_message,
};
