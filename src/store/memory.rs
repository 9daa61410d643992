use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{CheckIn, CheckInEntry, NewStudent, Student, StudentSummary};

#[derive(Debug, Default)]
struct Tables {
    students: Vec<Student>,
    checkins: Vec<CheckIn>,
}

/// A store that lives in process memory, with the same unique indexes as
/// the database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_student_by_email_or_student_id(
        &self,
        email: &str,
        student_id: &str,
    ) -> Result<Option<Student>, StoreError> {
        Ok(self
            .tables()?
            .students
            .iter()
            .find(|s| s.email == email || s.student_id == student_id)
            .cloned())
    }

    async fn find_student_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<Student>, StoreError> {
        Ok(self
            .tables()?
            .students
            .iter()
            .find(|s| s.student_id == student_id)
            .cloned())
    }

    async fn insert_student(&self, student: NewStudent) -> Result<Student, StoreError> {
        let mut tables = self.tables()?;
        if tables.students.iter().any(|s| s.email == student.email) {
            return Err(StoreError::Duplicate {
                field: "email".to_string(),
            });
        }
        if tables
            .students
            .iter()
            .any(|s| s.student_id == student.student_id)
        {
            return Err(StoreError::Duplicate {
                field: "student_id".to_string(),
            });
        }

        let now = Utc::now();
        let stored = Student {
            id: Uuid::new_v4(),
            name: student.name,
            email: student.email,
            student_id: student.student_id,
            pincode: student.pincode,
            district: student.district,
            state: student.state,
            country: student.country,
            created_at: now,
            updated_at: now,
        };
        tables.students.push(stored.clone());
        Ok(stored)
    }

    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.tables()?.students.clone())
    }

    async fn upsert_checkin(
        &self,
        student: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError> {
        let mut tables = self.tables()?;
        if let Some(existing) = tables.checkins.iter_mut().find(|c| c.student == student) {
            existing.timestamp = timestamp;
            return Ok(Some(existing.clone()));
        }

        let created = CheckIn {
            id: Uuid::new_v4(),
            student,
            timestamp,
        };
        tables.checkins.push(created.clone());
        Ok(Some(created))
    }

    async fn list_checkins(&self) -> Result<Vec<CheckInEntry>, StoreError> {
        let tables = self.tables()?;
        // a check-in whose student is gone is skipped, like an inner join
        Ok(tables
            .checkins
            .iter()
            .filter_map(|checkin| {
                let student = tables.students.iter().find(|s| s.id == checkin.student)?;
                Some(CheckInEntry {
                    id: checkin.id,
                    student: StudentSummary::from(student),
                    timestamp: checkin.timestamp,
                })
            })
            .collect())
    }
}
