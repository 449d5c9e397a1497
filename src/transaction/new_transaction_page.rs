//! The page with the form for recording a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::local_date,
    transaction::form::{TransactionFormValues, kind_toggle_script, transaction_form},
};

/// The state needed to render the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the form for recording a new transaction.
///
/// The date field defaults to today in the server's local timezone.
pub async fn get_new_transaction_page(State(state): State<NewTransactionPageState>) -> Response {
    let Some(today) = local_date(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let values = TransactionFormValues::new(today);
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html_content(&nav_bar, &values);

    base(
        "New Transaction",
        &[HeadElement::ScriptSource(kind_toggle_script())],
        &content,
    )
    .into_response()
}

fn html_content(nav_bar: &Markup, values: &TransactionFormValues) -> Markup {
    html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Transaction" }

            (transaction_form(
                "hx-post",
                endpoints::TRANSACTIONS_API,
                "Save",
                values,
            ))
        }
    }
}
