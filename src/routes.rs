use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};

use crate::err::{Created, Fine, Payload};
use crate::models::{
    CheckInList, RecordCheckIn, RegisterStudent, StudentCheckedIn, StudentCreated, StudentList,
};
use crate::state::AppState;

pub async fn register_student(
    Extension(state): Extension<AppState>,
    body: Result<Json<RegisterStudent>, JsonRejection>,
) -> Payload<StudentCreated> {
    let Json(input) = body?;
    let student = state.registry.register_student(input).await?;
    Created("student created successfully", StudentCreated { student })
}

pub async fn list_students(Extension(state): Extension<AppState>) -> Payload<StudentList> {
    let students = state.registry.list_students().await?;
    Fine("students fetched successfully", StudentList { students })
}

pub async fn record_checkin(
    Extension(state): Extension<AppState>,
    body: Result<Json<RecordCheckIn>, JsonRejection>,
) -> Payload<StudentCheckedIn> {
    let Json(RecordCheckIn {
        student_id,
        timestamp,
    }) = body?;
    let student_checkin = state.recorder.record_checkin(&student_id, timestamp).await?;
    Created(
        "Student checked in successfully",
        StudentCheckedIn { student_checkin },
    )
}

pub async fn list_checkins(Extension(state): Extension<AppState>) -> Payload<CheckInList> {
    let check_in_students = state.query.list_checkins().await?;
    Fine(
        "Checked in students fetched successfully",
        CheckInList { check_in_students },
    )
}
