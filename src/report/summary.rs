//! Aggregation of transactions into the totals shown on the dashboard,
//! profile and reports pages.

use crate::transaction::{Transaction, TransactionKind};

/// Per-category totals for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    /// The sum of all income values.
    pub total_income: f64,
    /// The sum of all fixed expense values.
    pub total_fixed_expense: f64,
    /// How many fixed expenses there are.
    pub fixed_expense_count: usize,
    /// The sum of all variable expense values.
    pub total_variable_expense: f64,
    /// How many variable expenses there are.
    pub variable_expense_count: usize,
}

impl ReportSummary {
    /// Income minus all expenses.
    pub fn balance(&self) -> f64 {
        self.total_income - self.total_fixed_expense - self.total_variable_expense
    }

    /// The sum of fixed and variable expenses.
    pub fn total_expenses(&self) -> f64 {
        self.total_fixed_expense + self.total_variable_expense
    }
}

/// Compute per-category totals in a single pass.
///
/// Non-finite values cannot be recorded through the forms, but a hand-edited
/// database row could contain one. Such values are skipped and logged so one
/// bad row cannot poison every total on the page.
pub fn aggregate<'a, I>(transactions: I) -> ReportSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = ReportSummary::default();

    for transaction in transactions {
        if !transaction.value.is_finite() {
            tracing::warn!(
                "skipping transaction {} with non-finite value {}",
                transaction.id,
                transaction.value
            );
            continue;
        }

        match transaction.kind {
            TransactionKind::Income => summary.total_income += transaction.value,
            TransactionKind::FixedExpense => {
                summary.total_fixed_expense += transaction.value;
                summary.fixed_expense_count += 1;
            }
            TransactionKind::VariableExpense => {
                summary.total_variable_expense += transaction.value;
                summary.variable_expense_count += 1;
            }
        }
    }

    summary
}
