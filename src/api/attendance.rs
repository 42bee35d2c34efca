use crate::{
    error::ApiError,
    model::attendance::{Attendance, AttendanceStatus, AttendanceWithEmployee},
    models::{ErrorResponse, MessageResponse},
    repo,
    utils::db_utils::is_foreign_key_violation,
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "E1")]
    pub employee_id: String,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Kept as text so an unknown value is a 400, not a payload decode failure
    #[schema(example = "Present")]
    pub status: String,
}

fn employee_not_found(employee_id: &str) -> ApiError {
    ApiError::NotFound(format!("Employee with ID '{}' not found", employee_id))
}

fn invalid_status() -> ApiError {
    ApiError::Conflict(format!(
        "Status must be either {}",
        AttendanceStatus::allowed_values()
    ))
}

/// Mark attendance; re-marking the same day overwrites the status
#[utoipa::path(
    post,
    path = "/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance created or updated", body = MessageResponse, example = json!({
            "message": "Attendance marked successfully for 2024-01-01",
            "detail": {
                "employee_id": "E1",
                "date": "2024-01-01",
                "status": "Present",
                "action": "created"
            }
        })),
        (status = 400, description = "Invalid status", body = ErrorResponse, example = json!({
            "detail": "Status must be either 'Present' or 'Absent'"
        })),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 422, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(pool, payload), fields(employee_id = %payload.employee_id, date = %payload.date))]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let MarkAttendance {
        employee_id,
        date,
        status,
    } = payload.into_inner();

    let status = match AttendanceStatus::from_str(&status) {
        Ok(status) => status,
        Err(_) => {
            // an unknown employee outranks a bad status
            let mut conn = pool.acquire().await?;
            if !repo::employee::exists(&mut conn, &employee_id).await? {
                return Err(employee_not_found(&employee_id));
            }
            return Err(invalid_status());
        }
    };

    // the first statement writes, so the transaction takes the write lock up front
    let mut tx = pool.begin().await?;

    let inserted = match repo::attendance::insert_if_absent(&mut tx, &employee_id, date, status).await {
        Ok(inserted) => inserted,
        Err(e) if is_foreign_key_violation(&e) => {
            tx.rollback().await?;
            return Err(employee_not_found(&employee_id));
        }
        Err(e) => return Err(e.into()),
    };

    let (action, message) = if inserted {
        ("created", format!("Attendance marked successfully for {}", date))
    } else {
        repo::attendance::update_status(&mut tx, &employee_id, date, status).await?;
        ("updated", format!("Attendance updated successfully for {}", date))
    };

    tx.commit().await?;

    info!(action, status = %status, "Attendance recorded");

    Ok(HttpResponse::Created().json(MessageResponse::with_detail(
        message,
        json!({
            "employee_id": employee_id,
            "date": date.to_string(),
            "status": status.as_ref(),
            "action": action
        }),
    )))
}

/// Attendance history of one employee, newest first
#[utoipa::path(
    get,
    path = "/attendance/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee identifier")
    ),
    responses(
        (status = 200, description = "Attendance records ordered by date descending", body = [Attendance]),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn get_employee_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let mut conn = pool.acquire().await?;

    if !repo::employee::exists(&mut conn, &employee_id).await? {
        return Err(employee_not_found(&employee_id));
    }

    let records = repo::attendance::list_for_employee(&mut conn, &employee_id).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Every attendance record with the employee's name (admin view)
#[utoipa::path(
    get,
    path = "/attendance",
    responses(
        (status = 200, description = "All attendance records ordered by date descending", body = [AttendanceWithEmployee]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.acquire().await?;
    let records = repo::attendance::list_all_with_employee(&mut conn).await?;

    Ok(HttpResponse::Ok().json(records))
}

#[cfg(test)]
mod tests {
    use crate::{
        db::{shared_pool, test_pool},
        routes,
    };
    use actix_web::{App, http::StatusCode, test, web::Data};
    use futures::future::join_all;
    use serde_json::{Value, json};

    macro_rules! post_json {
        ($app:expr, $uri:expr, $body:expr) => {{
            let req = test::TestRequest::post().uri($uri).set_json($body).to_request();
            test::call_service(&$app, req).await
        }};
    }

    fn employee(id: &str, name: &str) -> Value {
        json!({
            "employee_id": id,
            "full_name": name,
            "email": format!("{}@x.com", id.to_lowercase()),
            "department": "Eng"
        })
    }

    fn mark(id: &str, date: &str, status: &str) -> Value {
        json!({ "employee_id": id, "date": date, "status": status })
    }

    #[actix_web::test]
    async fn remarking_same_day_updates_in_place() {
        let pool = test_pool().await;
        let app = test::init_service(
            App::new().app_data(Data::new(pool)).configure(routes::configure),
        )
        .await;

        post_json!(app, "/employees", employee("E1", "Alice"));

        let resp = post_json!(app, "/attendance", mark("E1", "2024-01-01", "Present"));
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Attendance marked successfully for 2024-01-01");
        assert_eq!(body["detail"]["action"], "created");
        assert_eq!(body["detail"]["status"], "Present");

        let resp = post_json!(app, "/attendance", mark("E1", "2024-01-01", "Absent"));
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Attendance updated successfully for 2024-01-01");
        assert_eq!(
            body["detail"],
            json!({
                "employee_id": "E1",
                "date": "2024-01-01",
                "status": "Absent",
                "action": "updated"
            })
        );

        let req = test::TestRequest::get().uri("/attendance/E1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["status"], "Absent");
        assert_eq!(records[0]["date"], "2024-01-01");
    }

    #[actix_web::test]
    async fn unknown_employee_is_not_found_even_with_bad_status() {
        let pool = test_pool().await;
        let app = test::init_service(
            App::new().app_data(Data::new(pool)).configure(routes::configure),
        )
        .await;

        let resp = post_json!(app, "/attendance", mark("ghost", "2024-01-01", "Present"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Employee with ID 'ghost' not found");

        let resp = post_json!(app, "/attendance", mark("ghost", "2024-01-01", "Sleeping"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/attendance/ghost").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn invalid_status_is_rejected() {
        let pool = test_pool().await;
        let app = test::init_service(
            App::new().app_data(Data::new(pool)).configure(routes::configure),
        )
        .await;

        post_json!(app, "/employees", employee("E1", "Alice"));

        for status in ["present", "Late", ""] {
            let resp = post_json!(app, "/attendance", mark("E1", "2024-01-01", status));
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["detail"], "Status must be either 'Present' or 'Absent'");
        }

        let req = test::TestRequest::get().uri("/attendance/E1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn malformed_date_is_unprocessable() {
        let pool = test_pool().await;
        let app = test::init_service(
            App::new().app_data(Data::new(pool)).configure(routes::configure),
        )
        .await;

        post_json!(app, "/employees", employee("E1", "Alice"));

        let resp = post_json!(app, "/attendance", mark("E1", "01/02/2024", "Present"));
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn history_is_newest_first() {
        let pool = test_pool().await;
        let app = test::init_service(
            App::new().app_data(Data::new(pool)).configure(routes::configure),
        )
        .await;

        post_json!(app, "/employees", employee("E1", "Alice"));
        for date in ["2024-01-02", "2024-03-15", "2023-12-31", "2024-01-10"] {
            let resp = post_json!(app, "/attendance", mark("E1", date, "Present"));
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/attendance/E1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let dates: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, ["2024-03-15", "2024-01-10", "2024-01-02", "2023-12-31"]);
    }

    #[actix_web::test]
    async fn admin_view_joins_employee_names() {
        let pool = test_pool().await;
        let app = test::init_service(
            App::new().app_data(Data::new(pool)).configure(routes::configure),
        )
        .await;

        post_json!(app, "/employees", employee("E1", "Alice"));
        post_json!(app, "/employees", employee("E2", "Bob"));
        post_json!(app, "/attendance", mark("E1", "2024-01-01", "Present"));
        post_json!(app, "/attendance", mark("E2", "2024-01-03", "Absent"));
        post_json!(app, "/attendance", mark("E1", "2024-01-02", "Absent"));

        let req = test::TestRequest::get().uri("/attendance").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 3);

        let summary: Vec<(&str, &str, &str, &str)> = records
            .iter()
            .map(|r| {
                (
                    r["employee_id"].as_str().unwrap(),
                    r["full_name"].as_str().unwrap(),
                    r["date"].as_str().unwrap(),
                    r["status"].as_str().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            [
                ("E2", "Bob", "2024-01-03", "Absent"),
                ("E1", "Alice", "2024-01-02", "Absent"),
                ("E1", "Alice", "2024-01-01", "Present"),
            ]
        );
        assert!(records.iter().all(|r| r["id"].is_i64()));
    }

    #[actix_web::test]
    async fn concurrent_marks_for_one_day_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let pool = shared_pool(&dir, 8).await;
        let app = test::init_service(
            App::new().app_data(Data::new(pool.clone())).configure(routes::configure),
        )
        .await;

        post_json!(app, "/employees", employee("E1", "Alice"));

        let calls = (0..16).map(|i| {
            let status = if i % 2 == 0 { "Present" } else { "Absent" };
            let req = test::TestRequest::post()
                .uri("/attendance")
                .set_json(mark("E1", "2024-01-01", status))
                .to_request();
            test::call_service(&app, req)
        });
        let responses = join_all(calls).await;

        let mut created = 0;
        for resp in responses {
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            match body["detail"]["action"].as_str() {
                Some("created") => created += 1,
                Some("updated") => {}
                other => panic!("unexpected action {other:?}"),
            }
        }
        assert_eq!(created, 1);

        let rows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance WHERE employee_id = 'E1' AND date = '2024-01-01'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(rows, 1);
    }

    #[actix_web::test]
    async fn delete_racing_marks_leaves_no_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let pool = shared_pool(&dir, 8).await;
        let app = test::init_service(
            App::new().app_data(Data::new(pool.clone())).configure(routes::configure),
        )
        .await;

        post_json!(app, "/employees", employee("E1", "Alice"));
        post_json!(app, "/attendance", mark("E1", "2024-01-01", "Present"));

        let marks = (1..=8).map(|day| {
            let req = test::TestRequest::post()
                .uri("/attendance")
                .set_json(mark("E1", &format!("2024-02-{:02}", day), "Present"))
                .to_request();
            test::call_service(&app, req)
        });
        let delete = test::call_service(
            &app,
            test::TestRequest::delete().uri("/employees/E1").to_request(),
        );
        let (mark_responses, delete_response) = futures::join!(join_all(marks), delete);

        assert_eq!(delete_response.status(), StatusCode::OK);
        for resp in mark_responses {
            assert!(
                matches!(resp.status(), StatusCode::CREATED | StatusCode::NOT_FOUND),
                "unexpected status {}",
                resp.status()
            );
        }

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }
}
