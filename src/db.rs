//! Database initialisation for the application.

use rusqlite::Connection;

use crate::{transaction::create_transaction_table, user::create_user_table};

/// Create the application's tables if they do not exist yet.
///
/// Foreign key enforcement is switched on for the connection, so transactions
/// can never reference a missing user.
///
/// # Errors
///
/// This function will return an error if any of the SQL queries failed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    create_user_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
