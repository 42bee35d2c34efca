use crate::api::attendance::MarkAttendance;
use crate::api::employee::CreateEmployee;
use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceWithEmployee};
use crate::model::employee::Employee;
use crate::models::{ErrorResponse, MessageResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

A lightweight Human Resource Management System API for managing employees and attendance.

### Key Features
- **Employee Management**
  - Create, list, view and delete employee records
  - Deleting an employee removes its attendance history
- **Attendance Management**
  - Mark a day as `Present` or `Absent`; marking the same day again overwrites it
  - Per-employee history and an all-employees view, newest first

### Response Format
- JSON bodies, dates as `YYYY-MM-DD`
- Errors carry a human-readable `detail`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::system::index,
        crate::api::system::health,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::get_employee_attendance,
        crate::api::attendance::list_attendance
    ),
    components(
        schemas(
            CreateEmployee,
            Employee,
            MarkAttendance,
            Attendance,
            AttendanceStatus,
            AttendanceWithEmployee,
            MessageResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Employees", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Root", description = "Service banner"),
        (name = "Health", description = "Liveness check"),
    )
)]
pub struct ApiDoc;
