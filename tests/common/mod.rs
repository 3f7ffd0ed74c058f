// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use caixa::http::{build_app, AppState, CPF_HEADER};
use caixa::{CustomerHandle, Ledger, ManualClock};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

/// Helper to create a ledger whose clock the test controls
pub fn test_ledger() -> (Ledger, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let ledger = Ledger::with_clock(clock.clone());
    (ledger, clock)
}

/// Helper to build a UTC instant at the given hour of a local calendar day
pub fn local_datetime(date_str: &str, hour: u32) -> DateTime<Utc> {
    let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap();
    Local
        .from_local_datetime(&naive)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Register a customer and resolve its handle
pub fn register(ledger: &Ledger, cpf: &str, name: &str) -> Result<CustomerHandle> {
    ledger.register_customer(cpf.into(), name.into())?;
    Ok(ledger.find_by_cpf(cpf)?)
}

/// Test fixture: router over a fresh ledger with a controllable clock
pub struct TestApp {
    pub router: Router,
    pub ledger: Arc<Ledger>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let (ledger, clock) = test_ledger();
        let ledger = Arc::new(ledger);
        let router = build_app(AppState::new(ledger.clone()));
        Self {
            router,
            ledger,
            clock,
        }
    }

    /// Send a request and return status, headers and raw body
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        cpf: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, HeaderMap, Vec<u8>)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cpf) = cpf {
            builder = builder.header(CPF_HEADER, cpf);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("Failed to read response body")?;
        Ok((status, headers, bytes.to_vec()))
    }

    /// Send a request and decode the body as JSON (`Value::Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cpf: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let (status, _, bytes) = self.send_raw(method, uri, cpf, body).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }
}
