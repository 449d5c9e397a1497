//! PDF export of the filtered report table.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    html::format_currency,
    report::filter::{ReportQuery, TransactionFilter, filter_transactions},
    transaction::{Transaction, get_transactions_by_user},
};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const ROW_HEIGHT_MM: f32 = 8.0;

// Column offsets from the left edge.
const KIND_COLUMN_MM: f32 = 15.0;
const VALUE_COLUMN_MM: f32 = 70.0;
const DATE_COLUMN_MM: f32 = 115.0;
const STATUS_COLUMN_MM: f32 = 160.0;

const TITLE_FONT_SIZE: f32 = 18.0;
const BODY_FONT_SIZE: f32 = 11.0;

/// The state needed for the PDF export endpoint.
#[derive(Debug, Clone)]
pub struct ReportPdfState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportPdfState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Export the filtered transactions as a PDF attachment.
///
/// Takes the same query parameters as the reports page so the export always
/// matches what is on screen.
pub async fn get_report_pdf(
    State(state): State<ReportPdfState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_by_user(user_id, &connection)?;
    drop(connection);

    let filter = TransactionFilter::from_query(&query);
    let filtered = filter_transactions(&transactions, &filter);

    let pdf_bytes = render_report_pdf(&filtered)?;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"transaction-report.pdf\"",
            ),
        ],
        pdf_bytes,
    )
        .into_response())
}

/// Render the transactions as a PDF document with a title and a table with
/// the columns type, value, date and status.
pub fn render_report_pdf(transactions: &[&Transaction]) -> Result<Vec<u8>, Error> {
    let (document, page, layer) = PdfDocument::new(
        "Transaction Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let font = add_font(&document, BuiltinFont::Helvetica)?;
    let bold_font = add_font(&document, BuiltinFont::HelveticaBold)?;

    let mut current_layer = document.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    current_layer.use_text(
        "Transaction Report",
        TITLE_FONT_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &bold_font,
    );
    y -= ROW_HEIGHT_MM * 2.0;

    write_row(
        &current_layer,
        y,
        &bold_font,
        ["Type", "Value", "Date", "Status"],
    );
    y -= ROW_HEIGHT_MM;

    for transaction in transactions {
        if y < MARGIN_MM {
            let (next_page, next_layer) =
                document.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            current_layer = document.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }

        let status = match transaction.status {
            Some(status) => status.label(),
            None => "-",
        };

        write_row(
            &current_layer,
            y,
            &font,
            [
                transaction.kind.label(),
                &format_currency(transaction.value),
                &transaction.date.to_string(),
                status,
            ],
        );
        y -= ROW_HEIGHT_MM;
    }

    document
        .save_to_bytes()
        .map_err(|error| Error::PdfError(error.to_string()))
}

fn add_font(
    document: &PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, Error> {
    document
        .add_builtin_font(font)
        .map_err(|error| Error::PdfError(error.to_string()))
}

fn write_row(
    layer: &printpdf::PdfLayerReference,
    y: f32,
    font: &IndirectFontRef,
    [kind, value, date, status]: [&str; 4],
) {
    layer.use_text(kind, BODY_FONT_SIZE, Mm(KIND_COLUMN_MM), Mm(y), font);
    layer.use_text(value, BODY_FONT_SIZE, Mm(VALUE_COLUMN_MM), Mm(y), font);
    layer.use_text(date, BODY_FONT_SIZE, Mm(DATE_COLUMN_MM), Mm(y), font);
    layer.use_text(status, BODY_FONT_SIZE, Mm(STATUS_COLUMN_MM), Mm(y), font);
}
