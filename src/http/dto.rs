//! Request/response bodies and the JSON mapping helpers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::application::AccountInfo;
use crate::domain::{
    cents_to_units, parse_cents, Cents, Customer, OperationKind, StatementOperation,
};

use super::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub cpf: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub description: Option<String>,
    pub amount: Number,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: Number,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// One statement line as the API renders it.
#[derive(Debug, Serialize)]
pub struct StatementEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: OperationKind,
}

impl From<StatementOperation> for StatementEntry {
    fn from(operation: StatementOperation) -> Self {
        Self {
            description: operation.description,
            amount: cents_to_units(operation.amount),
            date: operation.timestamp,
            kind: operation.kind,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub cpf: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub statement: Vec<StatementEntry>,
}

impl From<Customer> for AccountResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            cpf: customer.cpf,
            name: customer.name,
            created_at: customer.created_at,
            statement: statement_to_entries(customer.statement),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountInfoResponse {
    pub cpf: String,
    pub name: String,
    pub balance: f64,
    pub credit_count: usize,
    pub debit_count: usize,
    pub total_credits: f64,
    pub total_debits: f64,
    pub last_activity: Option<DateTime<Utc>>,
}

impl From<AccountInfo> for AccountInfoResponse {
    fn from(info: AccountInfo) -> Self {
        Self {
            cpf: info.customer.cpf,
            name: info.customer.name,
            balance: cents_to_units(info.balance),
            credit_count: info.totals.credit_count,
            debit_count: info.totals.debit_count,
            total_credits: cents_to_units(info.totals.total_credits),
            total_debits: cents_to_units(info.totals.total_debits),
            last_activity: info.last_activity,
        }
    }
}

pub fn statement_to_entries(statement: Vec<StatementOperation>) -> Vec<StatementEntry> {
    statement.into_iter().map(StatementEntry::from).collect()
}

/// Convert a JSON amount in currency units (e.g. `12.5`) to cents.
///
/// Floats are rendered in positional notation first, since `Number`'s own
/// formatting switches to exponents (`1.5e16`) for large values.
pub fn parse_amount(amount: &Number) -> Result<Cents, ApiError> {
    let text = match amount.as_f64() {
        Some(value) if amount.is_f64() => format!("{value}"),
        _ => amount.to_string(),
    };
    parse_cents(&text)
        .map_err(|e| ApiError::bad_request("invalid_amount", format!("Invalid amount: {e}")))
}

/// Parse a `YYYY-MM-DD` query date.
pub fn parse_query_date(date: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        ApiError::bad_request(
            "invalid_date",
            format!("Invalid date format '{date}'. Use YYYY-MM-DD"),
        )
    })
}
