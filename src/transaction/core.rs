//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::UserID};

// ============================================================================
// MODELS
// ============================================================================

/// The direction and recurrence class of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money coming in, e.g. salary.
    Income,
    /// A recurring expense such as rent, repeated monthly for a set number of months.
    FixedExpense,
    /// A one-off expense such as groceries.
    VariableExpense,
}

impl TransactionKind {
    /// The string stored in the database and used in form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::FixedExpense => "fixed_expense",
            TransactionKind::VariableExpense => "variable_expense",
        }
    }

    /// Parse the database/form representation of a transaction kind.
    pub fn from_str(text: &str) -> Option<Self> {
        match text {
            "income" => Some(TransactionKind::Income),
            "fixed_expense" => Some(TransactionKind::FixedExpense),
            "variable_expense" => Some(TransactionKind::VariableExpense),
            _ => None,
        }
    }

    /// The label shown to users in tables and form options.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::FixedExpense => "Fixed expense",
            TransactionKind::VariableExpense => "Variable expense",
        }
    }

    /// Whether this kind records money leaving the account.
    pub fn is_expense(&self) -> bool {
        matches!(
            self,
            TransactionKind::FixedExpense | TransactionKind::VariableExpense
        )
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        TransactionKind::from_str(text).ok_or_else(|| {
            FromSqlError::Other(format!("unknown transaction kind {text:?}").into())
        })
    }
}

/// Whether an expense has been paid yet.
///
/// Only expenses carry a payment status. Income is recorded without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl PaymentStatus {
    /// The string stored in the database and used in form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
        }
    }

    /// Parse the database/form representation of a payment status.
    pub fn from_str(text: &str) -> Option<Self> {
        match text {
            "paid" => Some(PaymentStatus::Paid),
            "pending" => Some(PaymentStatus::Pending),
            _ => None,
        }
    }

    /// The label shown to users in tables and form options.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
        }
    }
}

impl ToSql for PaymentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PaymentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        PaymentStatus::from_str(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown payment status {text:?}").into()))
    }
}

/// A single income or expense record belonging to a user.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The kind of transaction, which determines how it is aggregated in reports.
    pub kind: TransactionKind,
    /// A free-text description, e.g. "Salary" or "Rent".
    pub description: String,
    /// The amount of money involved. Always zero or more, the direction of
    /// the money flow is captured by `kind`.
    pub value: f64,
    /// When the transaction happened.
    pub date: Date,
    /// For fixed expenses, the number of months the expense repeats for.
    /// Always 1 for other kinds.
    pub months: i64,
    /// Whether the expense has been paid. Always `None` for income.
    pub status: Option<PaymentStatus>,
    /// The user that recorded this transaction.
    pub user_id: UserID,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        kind: TransactionKind,
        value: f64,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            description: description.to_owned(),
            value,
            date,
            months: 1,
            status: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder normalizes the fields that only apply to certain kinds:
/// income never has a payment status, and only fixed expenses keep a
/// recurrence longer than one month.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    pub kind: TransactionKind,
    pub description: String,
    pub value: f64,
    pub date: Date,
    pub months: i64,
    pub status: Option<PaymentStatus>,
}

impl TransactionBuilder {
    /// Set the number of months a fixed expense repeats for.
    ///
    /// Ignored for other kinds.
    pub fn months(mut self, months: i64) -> Self {
        if self.kind == TransactionKind::FixedExpense {
            self.months = months;
        }
        self
    }

    /// Set the payment status of an expense.
    ///
    /// Ignored for income.
    pub fn status(mut self, status: Option<PaymentStatus>) -> Self {
        if self.kind.is_expense() {
            self.status = status;
        }
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.value < 0.0 || !self.value.is_finite() {
            return Err(Error::InvalidValue(self.value));
        }

        if self.months < 1 {
            return Err(Error::InvalidMonths(self.months));
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder, owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidValue] if the value is negative or not finite,
/// - or [Error::InvalidMonths] if the recurrence is less than one month,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (kind, description, value, date, months, status, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, kind, description, value, date, months, status, user_id",
        )?
        .query_row(
            (
                builder.kind,
                builder.description,
                builder.value,
                builder.date,
                builder.months,
                builder.status,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: i64, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, kind, description, value, date, months, status, user_id
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all transactions owned by `user_id`, most recent first.
///
/// Transactions on the same date keep their insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, kind, description, value, date, months, status, user_id
             FROM \"transaction\" WHERE user_id = :user_id
             ORDER BY date DESC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|row| row.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the stored fields of the transaction with `builder`.
///
/// The owner of the transaction does not change.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidValue] if the value is negative or not finite,
/// - or [Error::InvalidMonths] if the recurrence is less than one month,
/// - or [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: i64,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    connection
        .prepare(
            "UPDATE \"transaction\"
             SET kind = ?1, description = ?2, value = ?3, date = ?4, months = ?5, status = ?6
             WHERE id = ?7
             RETURNING id, kind, description, value, date, months, status, user_id",
        )?
        .query_row(
            (
                builder.kind,
                builder.description,
                builder.value,
                builder.date,
                builder.months,
                builder.status,
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction with the given `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: i64, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                value REAL NOT NULL CHECK (value >= 0),
                date TEXT NOT NULL,
                months INTEGER NOT NULL DEFAULT 1 CHECK (months >= 1),
                status TEXT,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by the transactions and reports pages.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let kind = row.get(1)?;
    let description = row.get(2)?;
    let value = row.get(3)?;
    let date = row.get(4)?;
    let months = row.get(5)?;
    let status = row.get(6)?;
    let user_id: i64 = row.get(7)?;

    Ok(Transaction {
        id,
        kind,
        description,
        value,
        date,
        months,
        status,
        user_id: UserID::new(user_id),
    })
}

// ============================================================================
// TESTS
// ============================================================================
