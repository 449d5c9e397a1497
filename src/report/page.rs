//! The reports page: filter form, category totals chart, filtered table and
//! a link to the PDF export.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    navigation::NavBar,
    report::{
        chart::{category_totals_chart, chart_script, chart_view},
        filter::{ReportQuery, TransactionFilter, filter_transactions},
        summary::aggregate,
    },
    transaction::{PaymentStatus, Transaction, TransactionKind, get_transactions_by_user},
};

/// The state needed for the reports page.
#[derive(Debug, Clone)]
pub struct ReportsViewState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the reports page for the logged-in user.
pub async fn get_reports_page(
    State(state): State<ReportsViewState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    drop(connection);

    let filter = TransactionFilter::from_query(&query);
    let filtered = filter_transactions(&transactions, &filter);
    let summary = aggregate(filtered.iter().copied());
    let chart = category_totals_chart(&summary);

    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();
    let content = reports_view(&nav_bar, &filter, &filtered);

    Ok(base(
        "Reports",
        &[
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            chart_script(&chart),
        ],
        &content,
    )
    .into_response())
}

fn reports_view(
    nav_bar: &Markup,
    filter: &TransactionFilter,
    transactions: &[&Transaction],
) -> Markup {
    html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Reports" }

            (filter_form(filter))

            (chart_view())

            @if transactions.is_empty()
            {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "No transactions match the selected filters."
                }
            }
            @else
            {
                div class="w-full max-w-4xl"
                {
                    (report_table(transactions))
                }

                (pdf_export_link(filter))
            }
        }
    }
}

/// A GET form so the selected filters live in the URL and survive reloads
/// and the PDF export link.
fn filter_form(filter: &TransactionFilter) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::REPORTS_VIEW)
            class="grid grid-cols-2 md:grid-cols-5 gap-4 w-full max-w-4xl mb-6 items-end"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }

                input
                    type="date"
                    name="start_date"
                    id="start_date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[filter.start_date];
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }

                input
                    type="date"
                    name="end_date"
                    id="end_date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[filter.end_date];
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                select name="kind" id="kind" class=(FORM_SELECT_STYLE)
                {
                    option value="all" selected[filter.kind.is_none()] { "All" }

                    @for kind in [
                        TransactionKind::Income,
                        TransactionKind::FixedExpense,
                        TransactionKind::VariableExpense,
                    ]
                    {
                        option
                            value=(kind.as_str())
                            selected[filter.kind == Some(kind)]
                        {
                            (kind.label())
                        }
                    }
                }
            }

            div
            {
                label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                select name="status" id="status" class=(FORM_SELECT_STYLE)
                {
                    option value="all" selected[filter.status.is_none()] { "All" }

                    @for status in [PaymentStatus::Paid, PaymentStatus::Pending]
                    {
                        option
                            value=(status.as_str())
                            selected[filter.status == Some(status)]
                        {
                            (status.label())
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}

fn report_table(transactions: &[&Transaction]) -> Markup {
    html! {
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Value" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                }
            }

            tbody
            {
                @for transaction in transactions
                {
                    tr class=(TABLE_ROW_STYLE) data-report-row="true"
                    {
                        td class=(TABLE_CELL_STYLE) { (transaction.kind.label()) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(transaction.value)) }
                        td class=(TABLE_CELL_STYLE) { (transaction.date) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            @match transaction.status
                            {
                                Some(status) => { (status.label()) }
                                None => { "-" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn pdf_export_link(filter: &TransactionFilter) -> Markup {
    let query_string = filter.to_query_string();
    let href = if query_string.is_empty() {
        endpoints::REPORT_PDF.to_owned()
    } else {
        format!("{}?{}", endpoints::REPORT_PDF, query_string)
    };

    html! {
        p class="mt-4"
        {
            (link(&href, "Export as PDF"))
        }
    }
}

#[cfg(test)]
mod reports_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        PasswordHash, UserID,
        auth::create_user,
        db::initialize,
        endpoints,
        report::filter::ReportQuery,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{PaymentStatus, Transaction, TransactionKind, create_transaction},
    };

    use super::{ReportsViewState, get_reports_page};

    fn get_test_state() -> (ReportsViewState, UserID) {
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
            ReportsViewState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    fn create_test_transactions(state: &ReportsViewState, user_id: UserID) {
        let connection = state.db_connection.lock().unwrap();

        create_transaction(
            Transaction::build(
                TransactionKind::Income,
                1000.0,
                date!(2025 - 01 - 15),
                "Salary",
            ),
            user_id,
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(
                TransactionKind::FixedExpense,
                200.0,
                date!(2025 - 02 - 01),
                "Rent",
            )
            .status(Some(PaymentStatus::Paid)),
            user_id,
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(
                TransactionKind::VariableExpense,
                50.0,
                date!(2025 - 03 - 20),
                "Groceries",
            )
            .status(Some(PaymentStatus::Pending)),
            user_id,
            &connection,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn page_shows_filter_form_chart_and_table() {
        let (state, user_id) = get_test_state();
        create_test_transactions(&state, user_id);

        let response = get_reports_page(
            State(state),
            Extension(user_id),
            Query(ReportQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form_selector = Selector::parse(&format!(
            "form[action='{}'][method='get']",
            endpoints::REPORTS_VIEW
        ))
        .unwrap();
        assert!(document.select(&form_selector).next().is_some());

        let chart_selector = Selector::parse("#category-totals-chart").unwrap();
        assert!(document.select(&chart_selector).next().is_some());

        let row_selector = Selector::parse("tr[data-report-row='true']").unwrap();
        assert_eq!(document.select(&row_selector).count(), 3);
    }

    #[tokio::test]
    async fn filters_limit_table_rows() {
        let (state, user_id) = get_test_state();
        create_test_transactions(&state, user_id);

        let response = get_reports_page(
            State(state),
            Extension(user_id),
            Query(ReportQuery {
                kind: Some("fixed_expense".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let row_selector = Selector::parse("tr[data-report-row='true']").unwrap();
        let rows: Vec<_> = document.select(&row_selector).collect();
        assert_eq!(rows.len(), 1);

        let row_text = rows[0].text().collect::<String>();
        assert!(row_text.contains("Fixed expense"));
        assert!(row_text.contains("$200.00"));
    }

    #[tokio::test]
    async fn export_link_carries_the_active_filter() {
        let (state, user_id) = get_test_state();
        create_test_transactions(&state, user_id);

        let response = get_reports_page(
            State(state),
            Extension(user_id),
            Query(ReportQuery {
                kind: Some("income".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let link_selector = Selector::parse("a").unwrap();
        let want_href = format!("{}?kind=income", endpoints::REPORT_PDF);
        assert!(
            document
                .select(&link_selector)
                .any(|link| link.value().attr("href") == Some(want_href.as_str())),
            "No PDF export link pointing at {want_href}"
        );
    }

    #[tokio::test]
    async fn empty_result_shows_message_instead_of_table() {
        let (state, user_id) = get_test_state();

        let response = get_reports_page(
            State(state),
            Extension(user_id),
            Query(ReportQuery::default()),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("No transactions match the selected filters."));

        let row_selector = Selector::parse("tr[data-report-row='true']").unwrap();
        assert_eq!(document.select(&row_selector).count(), 0);
    }
}
