use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::cents_to_units;
use crate::io::Exporter;

use super::dto::{
    self, AccountInfoResponse, AccountResponse, CreateAccountRequest, DateQuery, DepositRequest,
    ExportQuery, UpdateAccountRequest, WithdrawRequest,
};
use super::errors::ApiError;
use super::resolve::ResolvedCustomer;
use super::AppState;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<Response, ApiError> {
    state.ledger.register_customer(body.cpf, body.name)?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "success" }))).into_response())
}

pub async fn get_account(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
) -> Json<AccountResponse> {
    Json(state.ledger.get_account(&customer).into())
}

pub async fn get_account_info(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
) -> Json<AccountInfoResponse> {
    Json(state.ledger.get_account_info(&customer).into())
}

pub async fn update_account(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
    Json(body): Json<UpdateAccountRequest>,
) -> StatusCode {
    state.ledger.rename_customer(&customer, body.name);
    StatusCode::NO_CONTENT
}

pub async fn delete_account(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
) -> Result<Response, ApiError> {
    state.ledger.remove_customer(&customer)?;
    Ok((StatusCode::OK, Json(json!({ "status": "success" }))).into_response())
}

pub async fn get_statement(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
) -> Json<Vec<dto::StatementEntry>> {
    Json(dto::statement_to_entries(
        state.ledger.get_statement(&customer),
    ))
}

pub async fn get_statement_by_date(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<dto::StatementEntry>>, ApiError> {
    let date = dto::parse_query_date(&query.date)?;
    Ok(Json(dto::statement_to_entries(
        state.ledger.get_statement_by_date(&customer, date),
    )))
}

pub async fn export_statement(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let exporter = Exporter::new(&state.ledger);
    let mut body = Vec::new();

    let content_type = match query.format.as_deref().unwrap_or("csv") {
        "csv" => {
            exporter.export_statement_csv(&customer, &mut body)?;
            "text/csv"
        }
        "json" => {
            exporter.export_statement_json(&customer, &mut body)?;
            "application/json"
        }
        other => {
            return Err(ApiError::bad_request(
                "invalid_format",
                format!("Unknown export format '{other}'. Use csv or json"),
            ));
        }
    };

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response())
}

pub async fn deposit(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
    Json(body): Json<DepositRequest>,
) -> Result<StatusCode, ApiError> {
    let amount = dto::parse_amount(&body.amount)?;
    state.ledger.deposit(&customer, amount, body.description)?;
    Ok(StatusCode::CREATED)
}

pub async fn withdraw(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
    Json(body): Json<WithdrawRequest>,
) -> Result<StatusCode, ApiError> {
    let amount = dto::parse_amount(&body.amount)?;
    state.ledger.withdraw(&customer, amount)?;
    Ok(StatusCode::CREATED)
}

pub async fn get_balance(
    State(state): State<AppState>,
    ResolvedCustomer(customer): ResolvedCustomer,
) -> Json<f64> {
    Json(cents_to_units(state.ledger.get_balance(&customer)))
}
