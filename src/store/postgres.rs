use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{CheckIn, CheckInEntry, NewStudent, Student, StudentSummary};

const UNIQUE_VIOLATION: &str = "23505";

const STUDENT_COLUMNS: &str =
    "id, name, email, student_id, pincode, district, state, country, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct CheckInRow {
    id: Uuid,
    checked_in_at: DateTime<Utc>,
    student: Uuid,
    name: String,
    student_id: String,
    email: String,
}

impl From<CheckInRow> for CheckInEntry {
    fn from(row: CheckInRow) -> Self {
        CheckInEntry {
            id: row.id,
            student: StudentSummary {
                id: row.student,
                name: row.name,
                student_id: row.student_id,
                email: row.email,
            },
            timestamp: row.checked_in_at,
        }
    }
}

impl PgStore {
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

/// Recovers the column name from a unique constraint named
/// `{table}_{column}_key`, which is how Postgres names them by default.
fn field_from_constraint(constraint: &str) -> &str {
    let constraint = constraint.strip_suffix("_key").unwrap_or(constraint);
    match constraint.split_once('_') {
        Some((_table, field)) if !field.is_empty() => field,
        _ => constraint,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let field = db.constraint().map(field_from_constraint).unwrap_or("unknown");
                return StoreError::Duplicate {
                    field: field.to_string(),
                };
            }
        }
        StoreError::Backend(err.to_string())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_student_by_email_or_student_id(
        &self,
        email: &str,
        student_id: &str,
    ) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE email = $1 OR student_id = $2 LIMIT 1",
            STUDENT_COLUMNS
        ))
        .bind(email)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn find_student_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE student_id = $1 LIMIT 1",
            STUDENT_COLUMNS
        ))
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn insert_student(&self, student: NewStudent) -> Result<Student, StoreError> {
        let now = Utc::now();
        let stored = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {cols}",
            cols = STUDENT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(student.name)
        .bind(student.email)
        .bind(student.student_id)
        .bind(student.pincode)
        .bind(student.district)
        .bind(student.state)
        .bind(student.country)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students ORDER BY seq",
            STUDENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn upsert_checkin(
        &self,
        student: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError> {
        let checkin = sqlx::query_as::<_, CheckIn>(
            "INSERT INTO checkins (id, student, checked_in_at) VALUES ($1, $2, $3) \
             ON CONFLICT (student) DO UPDATE SET checked_in_at = EXCLUDED.checked_in_at \
             RETURNING id, student, checked_in_at",
        )
        .bind(Uuid::new_v4())
        .bind(student)
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;
        Ok(checkin)
    }

    async fn list_checkins(&self) -> Result<Vec<CheckInEntry>, StoreError> {
        let rows = sqlx::query_as::<_, CheckInRow>(
            "SELECT c.id, c.checked_in_at, s.id AS student, s.name, s.student_id, s.email \
             FROM checkins c JOIN students s ON s.id = c.student \
             ORDER BY c.seq",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CheckInEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_names_map_to_fields() {
        assert_eq!(field_from_constraint("students_email_key"), "email");
        assert_eq!(field_from_constraint("students_student_id_key"), "student_id");
        assert_eq!(field_from_constraint("checkins_student_key"), "student");
        assert_eq!(field_from_constraint("pincode"), "pincode");
    }

    fn new_student(tag: &str) -> NewStudent {
        NewStudent {
            name: "A".into(),
            email: format!("{}@x.com", tag),
            student_id: tag.to_string(),
            pincode: 560001,
            district: "D".into(),
            state: "S".into(),
            country: "C".into(),
        }
    }

    // needs a live database: DATABASE_URL=postgres://... cargo test -- --ignored
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore]
    async fn upserts_and_unique_keys_against_postgres() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let store = PgStore::connect(&url).await.unwrap();
        store.migrate().await.unwrap();

        let tag = format!("pg-{}", Uuid::new_v4());
        let student = store.insert_student(new_student(&tag)).await.unwrap();

        let mut again = new_student(&tag);
        again.email = format!("other-{}", again.email);
        assert_eq!(
            store.insert_student(again).await,
            Err(StoreError::Duplicate {
                field: "student_id".into()
            })
        );

        let id = student.id;
        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.upsert_checkin(id, Utc::now()).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().unwrap().is_some());
        }

        let entries: Vec<_> = store
            .list_checkins()
            .await
            .unwrap()
            .into_iter()
            .filter(|entry| entry.student.id == student.id)
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].student.student_id, tag);
        assert_eq!(entries[0].student.email, student.email);
    }
}
