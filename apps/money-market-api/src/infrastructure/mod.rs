//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `compound/`: Compound v2 over an Ethereum JSON-RPC node
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers

pub mod compound;
pub mod http;
