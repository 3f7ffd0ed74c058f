//! Customer resolution: turning an inbound request into a registered customer.
//!
//! The only check today is possession of the cpf. A credential check can
//! replace [`CpfHeaderResolver`] without touching the ledger.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::application::{Ledger, LedgerError};
use crate::storage::CustomerHandle;

use super::errors::ApiError;
use super::AppState;

pub const CPF_HEADER: &str = "cpf";

pub trait CustomerResolver: Send + Sync {
    fn resolve(&self, ledger: &Ledger, headers: &HeaderMap) -> Result<CustomerHandle, ApiError>;
}

/// Trusts the `cpf` header sent by the client.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpfHeaderResolver;

impl CustomerResolver for CpfHeaderResolver {
    fn resolve(&self, ledger: &Ledger, headers: &HeaderMap) -> Result<CustomerHandle, ApiError> {
        let cpf = headers
            .get(CPF_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|cpf| !cpf.is_empty())
            .ok_or_else(|| LedgerError::CustomerNotFound(String::new()))?;

        Ok(ledger.find_by_cpf(cpf)?)
    }
}

/// Extractor for handlers that act on the requesting customer.
pub struct ResolvedCustomer(pub CustomerHandle);

#[async_trait]
impl FromRequestParts<AppState> for ResolvedCustomer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .resolver
            .resolve(&state.ledger, &parts.headers)
            .map(ResolvedCustomer)
    }
}
