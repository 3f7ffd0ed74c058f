use thiserror::Error;

use crate::domain::Cents;

/// Business-rule rejections. None of them leave the ledger modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Customer already exists: {0}")]
    CustomerAlreadyExists(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: Cents, required: Cents },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
