//! The API endpoint for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None
// instead of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState,
    auth::UserID,
    endpoints,
    transaction::{
        PaymentStatus, Transaction, TransactionBuilder, TransactionKind, create_transaction,
    },
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form fields submitted when creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    pub kind: TransactionKind,
    pub description: String,
    pub value: f64,
    pub date: Date,
    /// Only meaningful for fixed expenses.
    pub months: Option<i64>,
    /// Only meaningful for expenses.
    pub status: Option<PaymentStatus>,
}

impl TransactionForm {
    /// Convert the submitted fields into a builder.
    ///
    /// Fields that do not apply to the selected kind are dropped by the
    /// builder, so a stale hidden form field cannot leak into the record.
    pub fn into_builder(self) -> TransactionBuilder {
        Transaction::build(self.kind, self.value, self.date, &self.description)
            .months(self.months.unwrap_or(1))
            .status(self.status)
    }
}

/// Record a new transaction for the logged-in user and redirect to the
/// transactions page.
///
/// Invalid values produce an error alert instead.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let create_result = create_transaction(
        form.into_builder(),
        user_id,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    );

    match create_result {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
