pub mod application;
pub mod cli;
pub mod domain;
pub mod http;
pub mod io;
pub mod storage;
pub mod telemetry;

pub use application::Ledger;
pub use domain::*;
pub use storage::{CustomerHandle, Registry};
