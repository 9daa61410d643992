use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub student_id: String,
    pub pincode: i64,
    pub district: String,
    pub state: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated registration, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub student_id: String,
    pub pincode: i64,
    pub district: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CheckIn {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student: Uuid,
    #[sqlx(rename = "checked_in_at")]
    pub timestamp: DateTime<Utc>,
}

/// The part of a student shown next to their check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub student_id: String,
    pub email: String,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.name.clone(),
            student_id: student.student_id.clone(),
            email: student.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInEntry {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student: StudentSummary,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterStudent {
    pub name: String,
    pub email: String,
    pub student_id: String,
    #[serde(deserialize_with = "text_or_number")]
    pub pincode: String,
    pub district: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordCheckIn {
    pub student_id: String,
    #[serde(deserialize_with = "flexible_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Pincodes arrive from the form as text but some clients send numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(whole), _) => whole.to_string(),
            (None, Some(float)) if float.fract() == 0.0 => (float as i64).to_string(),
            _ => number.to_string(),
        },
    })
}

/// Accepts epoch milliseconds, RFC 3339, or an ISO date or date-time with
/// no offset, which is read as UTC.
fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    let raw = match Option::<Raw>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let timestamp = match raw {
        Raw::Millis(millis) => Utc.timestamp_millis_opt(millis).single(),
        Raw::Text(text) => parse_timestamp(text.trim()),
    };
    timestamp
        .map(Some)
        .ok_or_else(|| D::Error::custom("invalid timestamp"))
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentCreated {
    pub student: Student,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentList {
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCheckedIn {
    pub student_checkin: CheckIn,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInList {
    pub check_in_students: Vec<CheckInEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pincode_accepts_text_and_numbers() {
        let text: RegisterStudent =
            serde_json::from_value(json!({ "pincode": "560001" })).unwrap();
        let number: RegisterStudent = serde_json::from_value(json!({ "pincode": 560001 })).unwrap();
        let float: RegisterStudent =
            serde_json::from_value(json!({ "pincode": 560001.0 })).unwrap();
        let fraction: RegisterStudent =
            serde_json::from_value(json!({ "pincode": 5.5 })).unwrap();

        assert_eq!(text.pincode, "560001");
        assert_eq!(number.pincode, "560001");
        assert_eq!(float.pincode, "560001");
        assert_eq!(fraction.pincode, "5.5");
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let input: RegisterStudent =
            serde_json::from_value(json!({ "name": "A", "studentId": "S1" })).unwrap();

        assert_eq!(input.name, "A");
        assert_eq!(input.student_id, "S1");
        assert!(input.email.is_empty());
        assert!(input.pincode.is_empty());

        let checkin: RecordCheckIn = serde_json::from_value(json!({})).unwrap();
        assert!(checkin.student_id.is_empty());
        assert!(checkin.timestamp.is_none());
    }

    fn checkin_at(timestamp: serde_json::Value) -> Option<DateTime<Utc>> {
        let checkin: RecordCheckIn =
            serde_json::from_value(json!({ "student_id": "S1", "timestamp": timestamp })).unwrap();
        checkin.timestamp
    }

    #[test]
    fn timestamps_accept_every_date_form() {
        let ten_am = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(
            checkin_at(json!(1_700_000_000_000i64)),
            Utc.timestamp_millis_opt(1_700_000_000_000).single()
        );
        assert_eq!(checkin_at(json!("2024-01-01T10:00:00.000Z")), Some(ten_am));
        assert_eq!(checkin_at(json!("2024-01-01T15:30:00+05:30")), Some(ten_am));
        assert_eq!(checkin_at(json!("2024-01-01T10:00:00")), Some(ten_am));
        assert_eq!(checkin_at(json!("2024-01-01")), Some(midnight));
        assert_eq!(checkin_at(json!(null)), None);
    }

    #[test]
    fn unreadable_timestamps_are_rejected() {
        let result = serde_json::from_value::<RecordCheckIn>(
            json!({ "student_id": "S1", "timestamp": "yesterday" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn responses_use_frontend_field_names() {
        let checkin = CheckIn {
            id: Uuid::nil(),
            student: Uuid::nil(),
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(StudentCheckedIn {
            student_checkin: checkin,
        })
        .unwrap();

        assert!(value["studentCheckin"]["_id"].is_string());
        assert!(value["studentCheckin"]["timestamp"].is_string());
    }
}
