use crate::model::employee::Employee;
use sqlx::SqliteConnection;

pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

/// Unique constraints on `employee_id` and `email` reject duplicates here.
pub async fn insert(conn: &mut SqliteConnection, new: &NewEmployee) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO employees (employee_id, full_name, email, department)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&new.employee_id)
    .bind(&new.full_name)
    .bind(&new.email)
    .bind(&new.department)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, employee_id, full_name, email, department FROM employees ORDER BY id",
    )
    .fetch_all(&mut *conn)
    .await
}

pub async fn find_by_employee_id(
    conn: &mut SqliteConnection,
    employee_id: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_id, full_name, email, department
        FROM employees
        WHERE employee_id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn exists(conn: &mut SqliteConnection, employee_id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = ?)")
        .bind(employee_id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn delete_by_employee_id(
    conn: &mut SqliteConnection,
    employee_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
