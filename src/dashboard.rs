//! The dashboard page summarizing the user's finances.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    report::{ReportSummary, aggregate},
    timezone::local_date,
    transaction::{Transaction, get_transactions_by_user},
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the dashboard for the logged-in user.
///
/// Shows a summary of the current month (income, expenses, balance) and
/// count/total cards for each expense category over all transactions.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let Some(today) = local_date(&state.local_timezone) else {
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    drop(connection);

    let month_summary = aggregate(transactions_in_month(&transactions, today));
    let overall_summary = aggregate(&transactions);

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let content = dashboard_view(&nav_bar, &month_summary, &overall_summary);

    Ok(base("Dashboard", &[], &content).into_response())
}

fn transactions_in_month(transactions: &[Transaction], today: Date) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|transaction| {
            transaction.date.year() == today.year() && transaction.date.month() == today.month()
        })
        .collect()
}

fn dashboard_view(
    nav_bar: &Markup,
    month_summary: &ReportSummary,
    overall_summary: &ReportSummary,
) -> Markup {
    html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Dashboard" }

            h2 class="text-lg font-semibold mb-2" { "This month" }

            section class="grid grid-cols-1 md:grid-cols-3 gap-4 w-full max-w-4xl mb-6"
            {
                (summary_card("Income", month_summary.total_income, None))
                (summary_card("Expenses", month_summary.total_expenses(), None))
                (summary_card("Balance", month_summary.balance(), None))
            }

            h2 class="text-lg font-semibold mb-2" { "Expense categories" }

            section class="grid grid-cols-1 md:grid-cols-2 gap-4 w-full max-w-4xl"
            {
                (summary_card(
                    "Fixed expenses",
                    overall_summary.total_fixed_expense,
                    Some(overall_summary.fixed_expense_count),
                ))
                (summary_card(
                    "Variable expenses",
                    overall_summary.total_variable_expense,
                    Some(overall_summary.variable_expense_count),
                ))
            }
        }
    }
}

fn summary_card(title: &str, value: f64, count: Option<usize>) -> Markup {
    html! {
        div class=(CARD_STYLE) data-summary-card=(title)
        {
            h3 class="text-sm text-gray-500 dark:text-gray-400" { (title) }

            p class="text-2xl font-bold" { (format_currency(value)) }

            @if let Some(count) = count
            {
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (count)

                    @if count == 1 { " transaction" } @else { " transactions" }
                }
            }
        }
    }
}

#[cfg(test)]
mod dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::{Duration, OffsetDateTime};

    use crate::{
        PasswordHash, UserID,
        auth::create_user,
        db::initialize,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_state() -> (DashboardState, UserID) {
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
            DashboardState {
                db_connection: Arc::new(Mutex::new(connection)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            user.id,
        )
    }

    #[track_caller]
    fn assert_card_value(document: &scraper::Html, card_title: &str, want_value: &str) {
        let selector =
            Selector::parse(&format!("div[data-summary-card='{card_title}'] p")).unwrap();
        let value_text = document
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("No card titled {card_title}"))
            .text()
            .collect::<String>();

        assert_eq!(value_text.trim(), want_value);
    }

    #[tokio::test]
    async fn dashboard_shows_month_summary_and_category_cards() {
        let (state, user_id) = get_test_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionKind::Income, 1000.0, today, "Salary"),
                user_id,
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(TransactionKind::FixedExpense, 200.0, today, "Rent"),
                user_id,
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(TransactionKind::VariableExpense, 50.0, today, "Groceries"),
                user_id,
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        assert_card_value(&document, "Income", "$1,000.00");
        assert_card_value(&document, "Expenses", "$250.00");
        assert_card_value(&document, "Balance", "$750.00");
        assert_card_value(&document, "Fixed expenses", "$200.00");
        assert_card_value(&document, "Variable expenses", "$50.00");
    }

    #[tokio::test]
    async fn month_summary_excludes_other_months() {
        let (state, user_id) = get_test_state();
        let today = OffsetDateTime::now_utc().date();
        let long_ago = today - Duration::days(400);
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionKind::Income, 1000.0, long_ago, "Old salary"),
                user_id,
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(TransactionKind::FixedExpense, 200.0, long_ago, "Old rent"),
                user_id,
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;

        // The month cards are empty but the category cards cover everything.
        assert_card_value(&document, "Income", "$0.00");
        assert_card_value(&document, "Balance", "$0.00");
        assert_card_value(&document, "Fixed expenses", "$200.00");
    }

    #[tokio::test]
    async fn dashboard_with_no_transactions_shows_zeroes() {
        let (state, user_id) = get_test_state();

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;

        assert_card_value(&document, "Income", "$0.00");
        assert_card_value(&document, "Expenses", "$0.00");
        assert_card_value(&document, "Balance", "$0.00");
    }
}
