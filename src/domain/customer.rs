use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{compute_balance, Cents, StatementOperation};

pub type CustomerId = Uuid;

/// A registered customer and the statement it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    /// Natural key supplied by the client; unique among live customers
    pub cpf: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Append-only, in chronological order
    pub statement: Vec<StatementOperation>,
}

impl Customer {
    pub fn new(cpf: String, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cpf,
            name,
            created_at,
            statement: Vec::new(),
        }
    }

    pub fn balance(&self) -> Cents {
        compute_balance(&self.statement)
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.statement.last().map(|operation| operation.timestamp)
    }

    pub(crate) fn append(&mut self, operation: StatementOperation) {
        self.statement.push(operation);
    }
}
