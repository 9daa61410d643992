use std::sync::Arc;

use crate::err::Error;
use crate::models::{RegisterStudent, Student};
use crate::store::Store;
use crate::validate::validate_registration;

pub const STUDENT_EXISTS: &str = "Student already exists with email or student ID.";

#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn Store>,
}

impl Registry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Validates and stores a new student.
    ///
    /// The existence check and the insert are separate calls. Two identical
    /// registrations racing each other both pass the check, and the loser is
    /// turned away by the store's unique index instead.
    pub async fn register_student(&self, input: RegisterStudent) -> Result<Student, Error> {
        let student = validate_registration(input)?;

        let existing = self
            .store
            .find_student_by_email_or_student_id(&student.email, &student.student_id)
            .await?;
        if existing.is_some() {
            return Err(Error::Conflict(STUDENT_EXISTS.to_string()));
        }

        let created = self.store.insert_student(student).await?;
        log::info!(
            "Registered student `{}` ({})",
            created.student_id,
            created.id
        );
        Ok(created)
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, Error> {
        Ok(self.store.list_students().await?)
    }
}
