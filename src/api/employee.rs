use crate::{
    error::ApiError,
    model::employee::Employee,
    models::{ErrorResponse, MessageResponse},
    repo::{self, employee::NewEmployee},
    utils::{
        db_utils::unique_violation_column,
        validation::{require_email, require_non_empty},
    },
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "E1", value_type = String)]
    pub employee_id: String,
    #[schema(example = "Alice Doe", value_type = String)]
    pub full_name: String,
    #[schema(example = "alice@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "Engineering", value_type = String)]
    pub department: String,
}

impl CreateEmployee {
    /// Trimmed, checked view of the payload ready for insertion.
    pub fn validate(&self) -> Result<NewEmployee, ApiError> {
        Ok(NewEmployee {
            employee_id: require_non_empty("employee_id", &self.employee_id)?.to_string(),
            full_name: require_non_empty("full_name", &self.full_name)?.to_string(),
            email: require_email(&self.email)?,
            department: require_non_empty("department", &self.department)?.to_string(),
        })
    }
}

fn employee_not_found(employee_id: &str) -> ApiError {
    ApiError::NotFound(format!("Employee with ID '{}' not found", employee_id))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = MessageResponse, example = json!({
            "message": "Employee created successfully",
            "detail": {"employee_id": "E1"}
        })),
        (status = 400, description = "Duplicate employee id or email", body = ErrorResponse, example = json!({
            "detail": "Employee ID 'E1' already exists"
        })),
        (status = 422, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Employees"
)]
#[instrument(skip(pool, payload), fields(employee_id = %payload.employee_id))]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.validate()?;

    let mut conn = pool.acquire().await?;

    // uniqueness is enforced by the store, a losing racer lands here too
    if let Err(e) = repo::employee::insert(&mut conn, &new).await {
        return Err(match unique_violation_column(&e).as_deref() {
            Some("employees.employee_id") => {
                ApiError::Conflict(format!("Employee ID '{}' already exists", new.employee_id))
            }
            Some("employees.email") => {
                ApiError::Conflict(format!("Email '{}' already exists", new.email))
            }
            Some(_) => ApiError::Conflict("Employee ID or email already exists".to_string()),
            None => e.into(),
        });
    }

    info!("Employee created");

    Ok(HttpResponse::Created().json(MessageResponse::with_detail(
        "Employee created successfully",
        json!({ "employee_id": new.employee_id }),
    )))
}

#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "All employees", body = [Employee]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Employees"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.acquire().await?;
    let employees = repo::employee::list_all(&mut conn).await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by employee_id
#[utoipa::path(
    get,
    path = "/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee identifier")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = ErrorResponse, example = json!({
            "detail": "Employee with ID 'E1' not found"
        })),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let mut conn = pool.acquire().await?;
    let employee = repo::employee::find_by_employee_id(&mut conn, &employee_id)
        .await?
        .ok_or_else(|| employee_not_found(&employee_id))?;

    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee and its attendance
#[utoipa::path(
    delete,
    path = "/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee identifier")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse, example = json!({
            "message": "Employee 'E1' and all associated records deleted successfully"
        })),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Employees"
)]
#[instrument(skip(pool))]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    // writes only, so the transaction holds the write lock from its first statement
    let mut tx = pool.begin().await?;

    let removed = repo::attendance::delete_for_employee(&mut tx, &employee_id).await?;
    if repo::employee::delete_by_employee_id(&mut tx, &employee_id).await? == 0 {
        tx.rollback().await?;
        return Err(employee_not_found(&employee_id));
    }
    tx.commit().await?;

    info!(attendance_removed = removed, "Employee deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Employee '{}' and all associated records deleted successfully",
        employee_id
    ))))
}
