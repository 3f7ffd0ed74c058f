use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::Ledger;
use crate::domain::{compute_balance, format_cents, Customer, StatementOperation};
use crate::storage::CustomerHandle;

/// Statement of one customer as written by the JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementExport {
    pub cpf: String,
    pub name: String,
    pub exported_at: DateTime<Utc>,
    pub balance_cents: i64,
    pub operations: Vec<StatementOperation>,
}

/// Point-in-time dump of every customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub customers: Vec<Customer>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export a statement to CSV, one row per operation with a running balance
    pub fn export_statement_csv<W: Write>(
        &self,
        customer: &CustomerHandle,
        writer: W,
    ) -> Result<usize> {
        let statement = self.ledger.get_statement(customer);
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "timestamp",
            "type",
            "amount",
            "description",
            "balance",
        ])?;

        let mut balance = 0;
        for operation in &statement {
            balance += operation.signed_amount();
            csv_writer.write_record([
                operation.timestamp.to_rfc3339(),
                operation.kind.as_str().to_string(),
                format_cents(operation.amount),
                operation.description.clone().unwrap_or_default(),
                format_cents(balance),
            ])?;
        }

        csv_writer.flush().context("Failed to flush CSV export")?;
        Ok(statement.len())
    }

    /// Export a statement as a JSON document
    pub fn export_statement_json<W: Write>(
        &self,
        customer: &CustomerHandle,
        mut writer: W,
    ) -> Result<StatementExport> {
        let account = self.ledger.get_account(customer);

        let export = StatementExport {
            balance_cents: compute_balance(&account.statement),
            cpf: account.cpf,
            name: account.name,
            exported_at: Utc::now(),
            operations: account.statement,
        };

        let json = serde_json::to_string_pretty(&export)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(export)
    }

    /// Export every customer as a JSON snapshot
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            customers: self.ledger.list_customers(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
