//! The shared form template for creating and editing transactions.

use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    transaction::{PaymentStatus, TransactionKind},
};

/// The values used to pre-fill the transaction form.
pub struct TransactionFormValues {
    pub kind: TransactionKind,
    pub description: String,
    /// `None` renders an empty value input.
    pub value: Option<f64>,
    pub date: Date,
    pub months: i64,
    pub status: PaymentStatus,
}

impl TransactionFormValues {
    /// The default values for recording a new transaction on `date`.
    pub fn new(date: Date) -> Self {
        Self {
            kind: TransactionKind::Income,
            description: String::new(),
            value: None,
            date,
            months: 1,
            status: PaymentStatus::Paid,
        }
    }
}

/// JavaScript that hides the months field unless a fixed expense is selected,
/// and the status field when income is selected.
///
/// The server ignores the hidden fields regardless, this only keeps the form
/// tidy.
pub fn kind_toggle_script() -> PreEscaped<String> {
    PreEscaped(
        r#"
        function updateKindFields() {
            const kind = document.getElementById('kind').value;
            document.getElementById('months-field').style.display =
                kind === 'fixed_expense' ? '' : 'none';
            document.getElementById('status-field').style.display =
                kind === 'income' ? 'none' : '';
        }

        document.addEventListener('DOMContentLoaded', () => {
            document.getElementById('kind').addEventListener('change', updateKindFields);
            updateKindFields();
        });
        "#
        .to_owned(),
    )
}

fn kind_option(kind: TransactionKind, selected: TransactionKind) -> Markup {
    html! {
        option value=(kind.as_str()) selected[kind == selected] { (kind.label()) }
    }
}

fn status_option(status: PaymentStatus, selected: PaymentStatus) -> Markup {
    html! {
        option value=(status.as_str()) selected[status == selected] { (status.label()) }
    }
}

/// The form for creating or editing a transaction.
///
/// `hx_attribute` should be "hx-post" for creating and "hx-put" for editing,
/// with `endpoint` the matching API route.
pub fn transaction_form(
    hx_attribute: &str,
    endpoint: &str,
    submit_label: &str,
    values: &TransactionFormValues,
) -> Markup {
    html! {
        form
            hx-post=[(hx_attribute == "hx-post").then_some(endpoint)]
            hx-put=[(hx_attribute == "hx-put").then_some(endpoint)]
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6 w-full max-w-md"
        {
            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                select name="kind" id="kind" class=(FORM_SELECT_STYLE) required
                {
                    (kind_option(TransactionKind::Income, values.kind))
                    (kind_option(TransactionKind::FixedExpense, values.kind))
                    (kind_option(TransactionKind::VariableExpense, values.kind))
                }
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    type="text"
                    name="description"
                    id="description"
                    placeholder="e.g. Rent"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(values.description);
            }

            div
            {
                label for="value" class=(FORM_LABEL_STYLE) { "Value" }

                input
                    type="number"
                    name="value"
                    id="value"
                    class=(FORM_TEXT_INPUT_STYLE)
                    min="0"
                    step="0.01"
                    required
                    value=[values.value];
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    type="date"
                    name="date"
                    id="date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    value=(values.date);
            }

            div id="months-field"
            {
                label for="months" class=(FORM_LABEL_STYLE) { "Months" }

                input
                    type="number"
                    name="months"
                    id="months"
                    class=(FORM_TEXT_INPUT_STYLE)
                    min="1"
                    step="1"
                    value=(values.months);
            }

            div id="status-field"
            {
                label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                select name="status" id="status" class=(FORM_SELECT_STYLE)
                {
                    (status_option(PaymentStatus::Paid, values.status))
                    (status_option(PaymentStatus::Pending, values.status))
                }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class="w-full px-4 py-2 bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700
                    hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 text-white rounded"
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                (submit_label)
            }
        }
    }
}
