//! Creates the transaction table and implements create, read, update, and
//! delete operations, all scoped to an owning user.

use rusqlite::{Connection, OptionalExtension, Row, params_from_iter, types::Value};

use crate::{
    Error,
    transaction::models::{NewTransaction, Transaction, TransactionId, TransactionUpdate},
    user::UserID,
};

/// Create the transaction table.
///
/// The user table must be created first since transactions hold a foreign key
/// to their owning user.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        transaction_type: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
    })
}

/// Create a new transaction in the database.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred, e.g. the
/// owning user does not exist.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (user_id, amount, type, category, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            new_transaction.user_id.as_i64(),
            new_transaction.amount,
            new_transaction.transaction_type,
            &new_transaction.category,
            &new_transaction.description,
            new_transaction.date,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id,
        user_id: new_transaction.user_id,
        amount: new_transaction.amount,
        transaction_type: new_transaction.transaction_type,
        category: new_transaction.category,
        description: new_transaction.description,
        date: new_transaction.date,
    })
}

/// Get the transaction with `id` belonging to `user_id`, or `None` if there
/// is no such row.
///
/// A transaction that exists but belongs to another user is reported as
/// `None`, indistinguishable from a transaction that does not exist.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn get_transaction_by_id(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, type, category, description, date
                 FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .optional()
        .map_err(|error| error.into())
}

/// Check that the transaction `id` exists and belongs to `user_id`.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn is_owned_by(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM \"transaction\" WHERE id = ?1 AND user_id = ?2)",
            (id, user_id.as_i64()),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Apply a partial update to the transaction with `id` belonging to
/// `user_id`. Fields left unset in `update` keep their stored values, and an
/// update with no fields set succeeds without touching the row.
///
/// The ownership check and the update run as separate statements, so two
/// concurrent updates to the same row may interleave; the last write wins.
///
/// # Errors
///
/// Returns [Error::UpdateMissingTransaction] if the transaction does not
/// exist or belongs to another user, or [Error::SqlError] if an SQL related
/// error occurred.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<(), Error> {
    if !is_owned_by(user_id, id, connection)? {
        return Err(Error::UpdateMissingTransaction);
    }

    if update.is_empty() {
        return Ok(());
    }

    let mut set_clauses = Vec::new();
    let mut query_parameters: Vec<Value> = Vec::new();

    if let Some(amount) = update.amount {
        set_clauses.push(format!("amount = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Real(amount));
    }

    if let Some(transaction_type) = update.transaction_type {
        set_clauses.push(format!("type = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(transaction_type.to_string()));
    }

    if let Some(category) = update.category {
        set_clauses.push(format!("category = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(category));
    }

    if let Some(description) = update.description {
        set_clauses.push(format!("description = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(description));
    }

    if let Some(date) = update.date {
        set_clauses.push(format!("date = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(date.to_string()));
    }

    let query_string = format!(
        "UPDATE \"transaction\" SET {} WHERE id = ?{} AND user_id = ?{}",
        set_clauses.join(", "),
        query_parameters.len() + 1,
        query_parameters.len() + 2,
    );
    query_parameters.push(Value::Integer(id));
    query_parameters.push(Value::Integer(user_id.as_i64()));

    connection.execute(&query_string, params_from_iter(query_parameters.iter()))?;

    Ok(())
}

/// Delete the transaction with `id` belonging to `user_id`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingTransaction] if the transaction does not
/// exist or belongs to another user, or [Error::SqlError] if an SQL related
/// error occurred.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    if !is_owned_by(user_id, id, connection)? {
        return Err(Error::DeleteMissingTransaction);
    }

    connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(())
}
