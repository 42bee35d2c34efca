use sqlx::error::ErrorKind;

/// ===============================
/// Constraint violation helpers
/// ===============================

/// Returns the `table.column` named by a UNIQUE violation, e.g. `employees.email`.
pub fn unique_violation_column(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    if db_err.kind() != ErrorKind::UniqueViolation {
        return None;
    }

    // sqlite: "UNIQUE constraint failed: employees.email"
    db_err
        .message()
        .rsplit_once(": ")
        .map(|(_, column)| column.trim().to_string())
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.kind() == ErrorKind::ForeignKeyViolation)
}
