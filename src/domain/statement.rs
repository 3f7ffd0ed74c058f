use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money entering the account (deposit)
    Credit,
    /// Money leaving the account (withdrawal)
    Debit,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Credit => "credit",
            OperationKind::Debit => "debit",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry of a customer's statement.
/// Operations are immutable once appended; corrections are not supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementOperation {
    pub kind: OperationKind,
    /// Amount in cents (never negative)
    pub amount: Cents,
    /// When the ledger recorded the operation
    pub timestamp: DateTime<Utc>,
    /// Free text, only carried by credits
    pub description: Option<String>,
}

impl StatementOperation {
    pub fn credit(amount: Cents, description: Option<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: OperationKind::Credit,
            amount,
            timestamp,
            description,
        }
    }

    pub fn debit(amount: Cents, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: OperationKind::Debit,
            amount,
            timestamp,
            description: None,
        }
    }

    /// Signed effect of this operation on the balance.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            OperationKind::Credit => self.amount,
            OperationKind::Debit => -self.amount,
        }
    }

    /// Calendar day of the timestamp in the local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

/// Compute the balance of a statement.
/// Balance = sum of credits - sum of debits, folded in statement order.
pub fn compute_balance(statement: &[StatementOperation]) -> Cents {
    statement
        .iter()
        .fold(0, |balance, operation| balance + operation.signed_amount())
}

/// Select the operations recorded on the given local calendar day.
pub fn operations_on(statement: &[StatementOperation], date: NaiveDate) -> Vec<StatementOperation> {
    statement
        .iter()
        .filter(|operation| operation.local_date() == date)
        .cloned()
        .collect()
}

/// Per-kind totals over a statement.
///
/// Lifetime totals can exceed the range of `Cents` even while the balance
/// stays in range; they saturate at `Cents::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    pub credit_count: usize,
    pub debit_count: usize,
    pub total_credits: Cents,
    pub total_debits: Cents,
}

impl StatementTotals {
    pub fn net(&self) -> Cents {
        self.total_credits.saturating_sub(self.total_debits)
    }
}

pub fn compute_totals(statement: &[StatementOperation]) -> StatementTotals {
    statement
        .iter()
        .fold(StatementTotals::default(), |mut totals, operation| {
            match operation.kind {
                OperationKind::Credit => {
                    totals.credit_count += 1;
                    totals.total_credits = totals.total_credits.saturating_add(operation.amount);
                }
                OperationKind::Debit => {
                    totals.debit_count += 1;
                    totals.total_debits = totals.total_debits.saturating_add(operation.amount);
                }
            }
            totals
        })
}
