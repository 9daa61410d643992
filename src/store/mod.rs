//! Persistence for students and their check-ins.
//!
//! Services only see the [`Store`] trait. [`PgStore`] is what the server
//! runs on; [`MemoryStore`] keeps the same guarantees in process and backs
//! the tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CheckIn, CheckInEntry, NewStudent, Student};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A write was rejected by the unique index on `field`.
    #[error("duplicate value for unique field `{field}`")]
    Duplicate { field: String },
    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_student_by_email_or_student_id(
        &self,
        email: &str,
        student_id: &str,
    ) -> Result<Option<Student>, StoreError>;

    async fn find_student_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<Student>, StoreError>;

    /// Inserts the student, assigning its identity and timestamps. Fails
    /// with [`StoreError::Duplicate`] when the email or student ID is taken.
    async fn insert_student(&self, student: NewStudent) -> Result<Student, StoreError>;

    async fn list_students(&self) -> Result<Vec<Student>, StoreError>;

    /// Sets the check-in time for `student`, creating its check-in if there
    /// is none yet. This is a single atomic write.
    async fn upsert_checkin(
        &self,
        student: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError>;

    async fn list_checkins(&self) -> Result<Vec<CheckInEntry>, StoreError>;
}
