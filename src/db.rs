//! Database initialization for the application.

use rusqlite::Connection;

use crate::{Error, auth::create_user_table, transaction::create_transaction_table};

/// Create the tables for the application's domain models if they do not
/// already exist.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is some other
/// SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute("PRAGMA foreign_keys = ON", ())?;

    create_user_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
