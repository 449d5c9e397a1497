//! Filtering of transactions for the reports page.

use serde::Deserialize;
use time::{Date, format_description::well_known::Iso8601};

use crate::transaction::{PaymentStatus, Transaction, TransactionKind};

/// The filter applied to a user's transactions on the reports page.
///
/// Unset fields do not constrain the result. The filter is built once per
/// request from query parameters and is not persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Keep transactions on or after this date.
    pub start_date: Option<Date>,
    /// Keep transactions on or before this date.
    pub end_date: Option<Date>,
    /// Keep transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Keep transactions with this payment status.
    pub status: Option<PaymentStatus>,
}

/// The raw query parameters of the reports page and PDF export.
///
/// Kept as strings so a hand-edited URL degrades to "no filter" instead of a
/// rejected request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
}

impl TransactionFilter {
    /// Parse query parameters leniently.
    ///
    /// Empty values, the literal "all", and values that do not parse all
    /// mean "unset".
    pub fn from_query(query: &ReportQuery) -> Self {
        Self {
            start_date: query.start_date.as_deref().and_then(parse_date),
            end_date: query.end_date.as_deref().and_then(parse_date),
            kind: query
                .kind
                .as_deref()
                .and_then(TransactionKind::from_str),
            status: query
                .status
                .as_deref()
                .and_then(PaymentStatus::from_str),
        }
    }

    /// Whether `transaction` passes every set constraint.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(start_date) = self.start_date
            && transaction.date < start_date
        {
            return false;
        }

        if let Some(end_date) = self.end_date
            && transaction.date > end_date
        {
            return false;
        }

        if let Some(kind) = self.kind
            && transaction.kind != kind
        {
            return false;
        }

        if let Some(status) = self.status
            && transaction.status != Some(status)
        {
            return false;
        }

        true
    }

    /// Rebuild the query string for links that carry the active filter, such
    /// as the PDF export button.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();

        if let Some(start_date) = self.start_date {
            parts.push(format!("start_date={start_date}"));
        }
        if let Some(end_date) = self.end_date {
            parts.push(format!("end_date={end_date}"));
        }
        if let Some(kind) = self.kind {
            parts.push(format!("kind={}", kind.as_str()));
        }
        if let Some(status) = self.status {
            parts.push(format!("status={}", status.as_str()));
        }

        parts.join("&")
    }
}

fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text, &Iso8601::DATE).ok()
}

/// Keep the transactions that pass `filter`, preserving the input order.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}
