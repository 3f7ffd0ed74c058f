// Application layer - the ledger service and its error type.
// Transports (HTTP today) resolve a customer and call into `Ledger`.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
