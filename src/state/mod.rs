//! State management module.
//!
//! Contains the Hub (shared server state), the client registry and the
//! per-connection session handles stored in it.

mod hub;
mod registry;
mod session;

pub use hub::Hub;
pub use session::{DeliveryError, PendingSession, Session, SessionId};
