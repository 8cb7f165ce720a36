//! Network module.
//!
//! Contains the Gateway (TCP listener), Connection handler, and flood
//! protection.

mod connection;
mod gateway;
mod limit;

pub use connection::Connection;
pub use gateway::Gateway;
pub use limit::FloodGuard;
