//! Defines the route handler for the page that displays the user's transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionKind, get_transactions_by_user},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render an overview of the logged-in user's transactions, most recent first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    drop(connection);

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let content = transactions_view(&nav_bar, &transactions);

    Ok(base("Transactions", &[], &content).into_response())
}

fn transactions_view(nav_bar: &Markup, transactions: &[Transaction]) -> Markup {
    html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Transactions" }

            @if transactions.is_empty()
            {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "No transactions yet. "

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Record your first transaction"
                    }
                }
            }
            @else
            {
                // Table on desktop, cards on mobile.
                div class="hidden md:block w-full max-w-4xl"
                {
                    (transaction_table(transactions))
                }

                div class="md:hidden w-full max-w-md"
                {
                    @for transaction in transactions
                    {
                        (transaction_card(transaction))
                    }
                }
            }
        }
    }
}

fn transaction_table(transactions: &[Transaction]) -> Markup {
    html! {
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Value" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Months" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for transaction in transactions
                {
                    (transaction_table_row(transaction))
                }
            }
        }
    }
}

fn transaction_table_row(transaction: &Transaction) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (transaction.kind.label()) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.value)) }
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE)
            {
                @if transaction.kind == TransactionKind::FixedExpense
                {
                    (transaction.months)
                }
                @else
                {
                    span class="text-gray-400" { "N/A" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @match transaction.status
                {
                    Some(status) => { (status.label()) }
                    None => { span class="text-gray-400" { "N/A" } }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                (edit_and_delete_controls(transaction.id))
            }
        }
    }
}

fn transaction_card(transaction: &Transaction) -> Markup {
    html! {
        div class=(CARD_STYLE) data-transaction-row="true"
        {
            div class="flex justify-between items-center"
            {
                span class="font-medium" { (transaction.description) }
                span { (format_currency(transaction.value)) }
            }

            div class="text-sm text-gray-500 dark:text-gray-400"
            {
                (transaction.kind.label())
            }

            div class="flex justify-between items-center text-sm text-gray-500 dark:text-gray-400"
            {
                span { (transaction.date) }

                @if let Some(status) = transaction.status
                {
                    span { (status.label()) }
                }
            }

            div class="mt-2"
            {
                (edit_and_delete_controls(transaction.id))
            }
        }
    }
}

fn edit_and_delete_controls(transaction_id: i64) -> Markup {
    html! {
        a
            href=(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id))
            class=(LINK_STYLE)
        {
            "Edit"
        }

        " "

        button
            type="button"
            class=(BUTTON_DELETE_STYLE)
            hx-delete=(format_endpoint(endpoints::TRANSACTION, transaction_id))
            hx-target="closest [data-transaction-row]"
            hx-swap="outerHTML"
            hx-confirm="Delete this transaction?"
        {
            "Delete"
        }
    }
}

#[cfg(test)]
mod transactions_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        PasswordHash, UserID,
        auth::create_user,
        db::initialize,
        endpoints::{self, format_endpoint},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{PaymentStatus, Transaction, TransactionKind, create_transaction},
    };

    use super::{TransactionsViewState, get_transactions_page};

    fn get_test_state() -> (TransactionsViewState, UserID) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        let user = create_user(
            "test@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .expect("Could not create test user");

        (
            TransactionsViewState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn page_shows_empty_state_without_transactions() {
        let (state, user_id) = get_test_state();

        let response = get_transactions_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("No transactions yet"));
    }

    #[tokio::test]
    async fn page_lists_transactions_with_edit_and_delete_controls() {
        let (state, user_id) = get_test_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::VariableExpense,
                    50.0,
                    date!(2025 - 10 - 05),
                    "Groceries",
                )
                .status(Some(PaymentStatus::Pending)),
                user_id,
                &connection,
            )
            .unwrap()
        };

        let response = get_transactions_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let row_selector = Selector::parse("tbody tr[data-transaction-row='true']").unwrap();
        let rows: Vec<_> = document.select(&row_selector).collect();
        assert_eq!(rows.len(), 1);

        let row_text = rows[0].text().collect::<String>();
        assert!(row_text.contains("Variable expense"));
        assert!(row_text.contains("Groceries"));
        assert!(row_text.contains("$50.00"));
        assert!(row_text.contains("Pending"));

        let edit_selector = Selector::parse("a").unwrap();
        let edit_href = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
        assert!(
            rows[0]
                .select(&edit_selector)
                .any(|link| link.value().attr("href") == Some(edit_href.as_str())),
            "No edit link pointing at {edit_href}"
        );

        let delete_selector = Selector::parse("button[hx-delete]").unwrap();
        let delete_endpoint = format_endpoint(endpoints::TRANSACTION, transaction.id);
        assert!(
            rows[0]
                .select(&delete_selector)
                .any(|button| button.value().attr("hx-delete") == Some(delete_endpoint.as_str())),
            "No delete button pointing at {delete_endpoint}"
        );
    }

    #[tokio::test]
    async fn page_omits_other_users_transactions() {
        let (state, user_id) = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let other_user = create_user(
                "other@example.com",
                PasswordHash::new_unchecked("hunter2"),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(TransactionKind::Income, 999.0, date!(2025 - 10 - 05), "test"),
                other_user.id,
                &connection,
            )
            .unwrap();
        }

        let response = get_transactions_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let text = document.root_element().text().collect::<String>();
        assert!(!text.contains("$999.00"));
    }
}
