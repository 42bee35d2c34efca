use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceWithEmployee};
use chrono::NaiveDate;
use sqlx::SqliteConnection;

/// Inserts the `(employee_id, date)` row unless one already exists.
/// Returns `true` when a row was inserted.
pub async fn insert_if_absent(
    conn: &mut SqliteConnection,
    employee_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status)
        VALUES (?, ?, ?)
        ON CONFLICT (employee_id, date) DO NOTHING
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(status)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn update_status(
    conn: &mut SqliteConnection,
    employee_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET status = ?
        WHERE employee_id = ?
        AND date = ?
        "#,
    )
    .bind(status)
    .bind(employee_id)
    .bind(date)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Most recent first.
pub async fn list_for_employee(
    conn: &mut SqliteConnection,
    employee_id: &str,
) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, date, status
        FROM attendance
        WHERE employee_id = ?
        ORDER BY date DESC, id DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn list_all_with_employee(
    conn: &mut SqliteConnection,
) -> Result<Vec<AttendanceWithEmployee>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceWithEmployee>(
        r#"
        SELECT a.id, a.employee_id, e.full_name, a.date, a.status
        FROM attendance a
        JOIN employees e ON e.employee_id = a.employee_id
        ORDER BY a.date DESC, a.id DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await
}

pub async fn delete_for_employee(
    conn: &mut SqliteConnection,
    employee_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
