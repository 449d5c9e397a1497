//! The profile page showing the account details and overall totals.

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
    auth::{UserID, get_user_by_id},
    endpoints,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base, format_currency, link},
    navigation::NavBar,
    report::{ReportSummary, aggregate},
    transaction::get_transactions_by_user,
};

/// The state needed for the profile page.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The database connection for reading the user and their transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the profile page for the logged-in user.
///
/// Shows the registered email address, the all-time totals and a log out
/// link.
pub async fn get_profile_page(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let transactions = get_transactions_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    drop(connection);

    let summary = aggregate(&transactions);

    let nav_bar = NavBar::new(endpoints::PROFILE_VIEW).into_html();
    let content = profile_view(&nav_bar, &user.email, &summary);

    Ok(base("Profile", &[], &content).into_response())
}

fn profile_view(nav_bar: &Markup, email: &str, summary: &ReportSummary) -> Markup {
    html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Profile" }

            div class=(CARD_STYLE)
            {
                h2 class="text-sm text-gray-500 dark:text-gray-400" { "Email" }

                p class="text-lg font-semibold" data-profile-email="true" { (email) }
            }

            div class=(CARD_STYLE)
            {
                h2 class="text-lg font-semibold mb-2" { "All-time totals" }

                dl class="grid grid-cols-3 gap-4"
                {
                    (totals_entry("Income", summary.total_income))
                    (totals_entry("Expenses", summary.total_expenses()))
                    (totals_entry("Balance", summary.balance()))
                }
            }

            (link(endpoints::LOG_OUT, "Log out"))
        }
    }
}

fn totals_entry(title: &str, value: f64) -> Markup {
    html! {
        div data-profile-total=(title)
        {
            dt class="text-sm text-gray-500 dark:text-gray-400" { (title) }

            dd class="text-xl font-bold" { (format_currency(value)) }
        }
    }
}
