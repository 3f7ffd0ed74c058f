use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

use crate::domain::{
    compute_balance, compute_totals, operations_on, Cents, Clock, Customer, StatementOperation,
    StatementTotals, SystemClock,
};
use crate::storage::{CustomerHandle, Registry};

use super::LedgerError;

/// In-memory bank-account ledger.
/// This is the only place business rules are evaluated; transports call into it.
pub struct Ledger {
    registry: Registry,
    clock: Arc<dyn Clock>,
}

/// Detailed account information
#[derive(Debug, Clone)]
pub struct AccountInfo {
    pub customer: Customer,
    pub balance: Cents,
    pub totals: StatementTotals,
    pub last_activity: Option<DateTime<Utc>>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an empty ledger stamping operations with wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Registry::new(),
            clock,
        }
    }

    // ========================
    // Customer operations
    // ========================

    /// Register a new customer with an empty statement.
    pub fn register_customer(&self, cpf: String, name: String) -> Result<Customer, LedgerError> {
        let customer = Customer::new(cpf, name, self.clock.now());
        let snapshot = customer.clone();

        if self.registry.insert_new(customer).is_none() {
            return Err(LedgerError::CustomerAlreadyExists(snapshot.cpf));
        }

        tracing::info!(customer_id = %snapshot.id, cpf = %snapshot.cpf, "customer registered");
        Ok(snapshot)
    }

    /// Resolve a customer by cpf.
    pub fn find_by_cpf(&self, cpf: &str) -> Result<CustomerHandle, LedgerError> {
        self.registry
            .get(cpf)
            .ok_or_else(|| LedgerError::CustomerNotFound(cpf.to_string()))
    }

    /// Snapshot of the full customer record, statement included.
    pub fn get_account(&self, customer: &CustomerHandle) -> Customer {
        customer.lock().clone()
    }

    /// Get detailed account information.
    pub fn get_account_info(&self, customer: &CustomerHandle) -> AccountInfo {
        let customer = customer.lock().clone();
        let balance = compute_balance(&customer.statement);
        let totals = compute_totals(&customer.statement);
        let last_activity = customer.last_activity();

        AccountInfo {
            customer,
            balance,
            totals,
            last_activity,
        }
    }

    /// Replace the customer's display name.
    pub fn rename_customer(&self, customer: &CustomerHandle, name: String) {
        customer.lock().name = name;
        tracing::debug!(cpf = %customer.cpf(), "customer renamed");
    }

    /// Remove the customer and its statement. The cpf becomes free again.
    pub fn remove_customer(&self, customer: &CustomerHandle) -> Result<(), LedgerError> {
        if !self.registry.remove(customer) {
            return Err(LedgerError::CustomerNotFound(customer.cpf().to_string()));
        }

        tracing::info!(cpf = %customer.cpf(), "customer removed");
        Ok(())
    }

    /// Number of registered customers.
    pub fn customer_count(&self) -> usize {
        self.registry.len()
    }

    /// All registered customers, ordered by cpf.
    pub fn list_customers(&self) -> Vec<Customer> {
        self.registry
            .handles()
            .iter()
            .map(|handle| handle.lock().clone())
            .collect()
    }

    // ========================
    // Statement operations
    // ========================

    /// Full statement in chronological order.
    pub fn get_statement(&self, customer: &CustomerHandle) -> Vec<StatementOperation> {
        customer.lock().statement.clone()
    }

    /// Operations recorded on the given local calendar day.
    pub fn get_statement_by_date(
        &self,
        customer: &CustomerHandle,
        date: NaiveDate,
    ) -> Vec<StatementOperation> {
        operations_on(&customer.lock().statement, date)
    }

    /// Current balance, recomputed from the statement.
    pub fn get_balance(&self, customer: &CustomerHandle) -> Cents {
        compute_balance(&customer.lock().statement)
    }

    /// Append a credit.
    pub fn deposit(
        &self,
        customer: &CustomerHandle,
        amount: Cents,
        description: Option<String>,
    ) -> Result<StatementOperation, LedgerError> {
        validate_amount(amount)?;

        let mut account = customer.lock();
        if compute_balance(&account.statement)
            .checked_add(amount)
            .is_none()
        {
            return Err(LedgerError::InvalidAmount(
                "Deposit would overflow the balance".to_string(),
            ));
        }

        let operation = StatementOperation::credit(amount, description, self.clock.now());
        account.append(operation.clone());

        tracing::debug!(cpf = %customer.cpf(), amount, "deposit recorded");
        Ok(operation)
    }

    /// Append a debit if the balance covers it.
    ///
    /// The balance check and the append run under the customer's lock, so two
    /// concurrent withdrawals cannot both spend the same funds.
    pub fn withdraw(
        &self,
        customer: &CustomerHandle,
        amount: Cents,
    ) -> Result<StatementOperation, LedgerError> {
        validate_amount(amount)?;

        let mut account = customer.lock();
        let balance = compute_balance(&account.statement);
        if balance < amount {
            tracing::info!(
                cpf = %customer.cpf(),
                balance,
                required = amount,
                "withdrawal rejected"
            );
            return Err(LedgerError::InsufficientFunds {
                balance,
                required: amount,
            });
        }

        let operation = StatementOperation::debit(amount, self.clock.now());
        account.append(operation.clone());

        tracing::debug!(cpf = %customer.cpf(), amount, "withdrawal recorded");
        Ok(operation)
    }
}

fn validate_amount(amount: Cents) -> Result<(), LedgerError> {
    if amount < 0 {
        return Err(LedgerError::InvalidAmount(
            "Amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_customer() -> (Ledger, CustomerHandle) {
        let ledger = Ledger::new();
        ledger
            .register_customer("111".into(), "Alice".into())
            .unwrap();
        let handle = ledger.find_by_cpf("111").unwrap();
        (ledger, handle)
    }

    #[test]
    fn test_register_returns_snapshot() {
        let ledger = Ledger::new();
        let customer = ledger
            .register_customer("111".into(), "Alice".into())
            .unwrap();

        assert_eq!(customer.cpf, "111");
        assert_eq!(customer.name, "Alice");
        assert!(customer.statement.is_empty());
        assert_eq!(ledger.customer_count(), 1);
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let (ledger, alice) = ledger_with_customer();

        assert!(matches!(
            ledger.deposit(&alice, -1, None),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            ledger.withdraw(&alice, -1),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(ledger.get_statement(&alice).is_empty());
    }

    #[test]
    fn test_zero_deposit_is_recorded() {
        let (ledger, alice) = ledger_with_customer();
        ledger.deposit(&alice, 0, None).unwrap();
        assert_eq!(ledger.get_statement(&alice).len(), 1);
        assert_eq!(ledger.get_balance(&alice), 0);
    }

    #[test]
    fn test_overflowing_deposit_rejected() {
        let (ledger, alice) = ledger_with_customer();
        ledger.deposit(&alice, Cents::MAX, None).unwrap();

        let result = ledger.deposit(&alice, 1, None);
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
        assert_eq!(ledger.get_statement(&alice).len(), 1);
    }

    #[test]
    fn test_account_info_after_spending_max_deposit() {
        let (ledger, alice) = ledger_with_customer();
        ledger.deposit(&alice, Cents::MAX, None).unwrap();
        ledger.withdraw(&alice, Cents::MAX).unwrap();
        ledger.deposit(&alice, 1, None).unwrap();

        let info = ledger.get_account_info(&alice);
        assert_eq!(info.balance, 1);
        assert_eq!(info.totals.credit_count, 2);
        assert_eq!(info.totals.total_credits, Cents::MAX);
        assert_eq!(info.totals.total_debits, Cents::MAX);
    }

    #[test]
    fn test_insufficient_funds_reports_balance() {
        let (ledger, alice) = ledger_with_customer();
        ledger.deposit(&alice, 500, None).unwrap();

        let err = ledger.withdraw(&alice, 501).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                balance: 500,
                required: 501
            }
        );
    }

    #[test]
    fn test_account_info_totals() {
        let (ledger, alice) = ledger_with_customer();
        ledger.deposit(&alice, 10000, Some("salary".into())).unwrap();
        let debit = ledger.withdraw(&alice, 2500).unwrap();

        let info = ledger.get_account_info(&alice);
        assert_eq!(info.balance, 7500);
        assert_eq!(info.totals.credit_count, 1);
        assert_eq!(info.totals.debit_count, 1);
        assert_eq!(info.totals.total_debits, 2500);
        assert_eq!(info.last_activity, Some(debit.timestamp));
    }

    #[test]
    fn test_remove_twice_is_not_found() {
        let (ledger, alice) = ledger_with_customer();
        ledger.remove_customer(&alice).unwrap();

        assert_eq!(
            ledger.remove_customer(&alice),
            Err(LedgerError::CustomerNotFound("111".into()))
        );
    }
}
