use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::err::Error;
use crate::models::CheckIn;
use crate::store::Store;
use crate::validate::validate_student_id;

pub const MISSING_STUDENT_ID: &str = "Please enter student ID";
pub const STUDENT_NOT_FOUND: &str = "Student not found";
pub const UPSERT_FAILED: &str = "Failed to update check-in record.";

#[derive(Clone)]
pub struct Recorder {
    store: Arc<dyn Store>,
}

impl Recorder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Records `timestamp` (or now) as the student's latest check-in.
    ///
    /// Each student has at most one check-in; checking in again overwrites
    /// its time. Concurrent check-ins for one student are last writer wins.
    pub async fn record_checkin(
        &self,
        student_id: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<CheckIn, Error> {
        let student_id = validate_student_id(student_id)?;
        let student = self
            .store
            .find_student_by_student_id(student_id)
            .await?
            .ok_or_else(|| Error::NotFound(STUDENT_NOT_FOUND.to_string()))?;

        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let checkin = self
            .store
            .upsert_checkin(student.id, timestamp)
            .await?
            .ok_or_else(|| Error::Internal(UPSERT_FAILED.to_string()))?;

        log::info!("Checked in student `{}` at {}", student.student_id, checkin.timestamp);
        Ok(checkin)
    }
}
