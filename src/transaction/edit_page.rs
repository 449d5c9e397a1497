//! The page with the form for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    internal_server_error::render_internal_server_error,
    navigation::NavBar,
    not_found::get_404_not_found_response,
    transaction::{
        PaymentStatus,
        form::{TransactionFormValues, kind_toggle_script, transaction_form},
        get_transaction,
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading the transaction being edited.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the form for editing a transaction.
///
/// Users can only edit their own transactions. A transaction owned by
/// someone else renders the 404 page, the same as an ID that does not exist.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<i64>,
) -> Response {
    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");

    let transaction = match get_transaction(transaction_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => {
            return get_404_not_found_response();
        }
        Err(error) => {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
            return render_internal_server_error(Default::default());
        }
    };
    drop(connection);

    if transaction.user_id != user_id {
        return get_404_not_found_response();
    }

    let values = TransactionFormValues {
        kind: transaction.kind,
        description: transaction.description.clone(),
        value: Some(transaction.value),
        date: transaction.date,
        months: transaction.months,
        status: transaction.status.unwrap_or(PaymentStatus::Paid),
    };

    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let content = html_content(&nav_bar, transaction_id, &values);

    base(
        "Edit Transaction",
        &[HeadElement::ScriptSource(kind_toggle_script())],
        &content,
    )
    .into_response()
}

fn html_content(nav_bar: &Markup, transaction_id: i64, values: &TransactionFormValues) -> Markup {
    html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Transaction" }

            (transaction_form(
                "hx-put",
                &format_endpoint(endpoints::TRANSACTION, transaction_id),
                "Save Changes",
                values,
            ))
        }
    }
}
