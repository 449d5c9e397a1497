//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - View and API handlers for recording, editing and deleting transactions

mod core;
mod create_transaction_endpoint;
mod delete_transaction_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod new_transaction_page;
mod transactions_page;

pub use core::{
    PaymentStatus, Transaction, TransactionBuilder, TransactionKind, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, get_transactions_by_user,
    update_transaction,
};
pub use create_transaction_endpoint::create_transaction_endpoint;
pub use delete_transaction_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use new_transaction_page::get_new_transaction_page;
pub use transactions_page::get_transactions_page;
