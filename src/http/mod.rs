//! HTTP transport (Axum router + shared state).
//!
//! - `routes.rs`: handlers, one per ledger operation
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses
//! - `resolve.rs`: mapping a request to the customer it acts on

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::Ledger;

pub mod dto;
pub mod errors;
pub mod resolve;
pub mod routes;

pub use errors::ApiError;
pub use resolve::{CpfHeaderResolver, CustomerResolver, CPF_HEADER};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub resolver: Arc<dyn CustomerResolver>,
}

impl AppState {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self::with_resolver(ledger, Arc::new(CpfHeaderResolver))
    }

    pub fn with_resolver(ledger: Arc<Ledger>, resolver: Arc<dyn CustomerResolver>) -> Self {
        Self { ledger, resolver }
    }
}

/// Build the full HTTP router.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/account",
            post(routes::create_account)
                .get(routes::get_account)
                .put(routes::update_account)
                .delete(routes::delete_account),
        )
        .route("/account/info", get(routes::get_account_info))
        .route("/statement", get(routes::get_statement))
        .route("/statement/date", get(routes::get_statement_by_date))
        .route("/statement/export", get(routes::export_statement))
        .route("/deposit", post(routes::deposit))
        .route("/withdraw", post(routes::withdraw))
        .route("/balance", get(routes::get_balance))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
