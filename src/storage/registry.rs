use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::Customer;

/// Shared reference to a registered customer.
///
/// Each customer sits behind its own mutex, so operations on different
/// customers never wait on each other.
#[derive(Debug, Clone)]
pub struct CustomerHandle {
    cpf: String,
    inner: Arc<Mutex<Customer>>,
}

impl CustomerHandle {
    fn new(customer: Customer) -> Self {
        Self {
            cpf: customer.cpf.clone(),
            inner: Arc::new(Mutex::new(customer)),
        }
    }

    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    /// Lock the customer for reading or mutation.
    ///
    /// Writers either push one operation or assign one field, so a poisoned
    /// lock still guards consistent data.
    pub fn lock(&self) -> MutexGuard<'_, Customer> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns true if both handles point at the same registered customer.
    pub fn same_customer(&self, other: &CustomerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// In-memory store of customers keyed by cpf.
#[derive(Debug, Default)]
pub struct Registry {
    customers: RwLock<HashMap<String, CustomerHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CustomerHandle>> {
        self.customers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CustomerHandle>> {
        self.customers.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a customer unless its cpf is already taken.
    /// The check and the insert happen under one write lock.
    pub fn insert_new(&self, customer: Customer) -> Option<CustomerHandle> {
        match self.write().entry(customer.cpf.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => Some(slot.insert(CustomerHandle::new(customer)).clone()),
        }
    }

    /// Get a customer by cpf.
    pub fn get(&self, cpf: &str) -> Option<CustomerHandle> {
        self.read().get(cpf).cloned()
    }

    /// Remove the customer the handle points at.
    ///
    /// Returns false when the cpf is free or now belongs to a customer
    /// registered after the handle was resolved.
    pub fn remove(&self, handle: &CustomerHandle) -> bool {
        let mut customers = self.write();
        let owned = customers
            .get(handle.cpf())
            .is_some_and(|current| current.same_customer(handle));
        if owned {
            customers.remove(handle.cpf());
        }
        owned
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All registered customers, ordered by cpf.
    pub fn handles(&self) -> Vec<CustomerHandle> {
        let mut handles: Vec<CustomerHandle> = self.read().values().cloned().collect();
        handles.sort_by(|a, b| a.cpf().cmp(b.cpf()));
        handles
    }
}
