use lazy_static::lazy_static;
use regex::Regex;

use crate::err::Error;
use crate::models::{NewStudent, RegisterStudent};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_PINCODE: &str = "Pincode must be a number";

lazy_static! {
    // the domain must end with at least two letters
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[a-zA-Z]{2,}$").unwrap();
}

/// Turns a registration form into a storable student.
///
/// Every field is trimmed first. Any empty field fails the whole form with a
/// single message; format problems are collected so the client sees all of
/// them at once.
pub fn validate_registration(input: RegisterStudent) -> Result<NewStudent, Error> {
    let fields = [
        &input.name,
        &input.email,
        &input.student_id,
        &input.pincode,
        &input.district,
        &input.state,
        &input.country,
    ];
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(Error::validation(ALL_FIELDS_REQUIRED));
    }

    let email = input.email.trim().to_lowercase();
    let mut problems = Vec::new();
    if !EMAIL.is_match(&email) {
        problems.push(INVALID_EMAIL.to_string());
    }
    let pincode = match input.pincode.trim().parse::<i64>() {
        Ok(pincode) => Some(pincode),
        Err(_) => {
            problems.push(INVALID_PINCODE.to_string());
            None
        }
    };

    match pincode {
        Some(pincode) if problems.is_empty() => Ok(NewStudent {
            name: input.name.trim().to_string(),
            email,
            student_id: input.student_id.trim().to_string(),
            pincode,
            district: input.district.trim().to_string(),
            state: input.state.trim().to_string(),
            country: input.country.trim().to_string(),
        }),
        _ => Err(Error::Schema(problems)),
    }
}

/// Trims a check-in's student ID, rejecting blank ones.
pub fn validate_student_id(student_id: &str) -> Result<&str, Error> {
    let student_id = student_id.trim();
    if student_id.is_empty() {
        return Err(Error::validation(crate::recorder::MISSING_STUDENT_ID));
    }
    Ok(student_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterStudent {
        RegisterStudent {
            name: "A".into(),
            email: "a@x.com".into(),
            student_id: "S1".into(),
            pincode: "560001".into(),
            district: "D".into(),
            state: "S".into(),
            country: "C".into(),
        }
    }

    #[test]
    fn accepts_complete_form() {
        let student = validate_registration(form()).unwrap();
        assert_eq!(student.pincode, 560001);
        assert_eq!(student.email, "a@x.com");
        assert_eq!(student.student_id, "S1");
    }

    #[test]
    fn trims_and_lowercases() {
        let student = validate_registration(RegisterStudent {
            name: "  Asha  ".into(),
            email: " Asha@Example.COM ".into(),
            student_id: " S1 ".into(),
            pincode: " 42 ".into(),
            ..form()
        })
        .unwrap();

        assert_eq!(student.name, "Asha");
        assert_eq!(student.email, "asha@example.com");
        assert_eq!(student.student_id, "S1");
        assert_eq!(student.pincode, 42);
    }

    #[test]
    fn blank_field_fails_before_format_checks() {
        let err = validate_registration(RegisterStudent {
            country: "   ".into(),
            email: "not-an-email".into(),
            ..form()
        })
        .unwrap_err();
        assert_eq!(err, Error::validation(ALL_FIELDS_REQUIRED));
    }

    #[test]
    fn collects_every_format_problem() {
        let err = validate_registration(RegisterStudent {
            email: "a@x.c".into(),
            pincode: "56OO01".into(),
            ..form()
        })
        .unwrap_err();
        assert_eq!(
            err,
            Error::Schema(vec![INVALID_EMAIL.into(), INVALID_PINCODE.into()])
        );
    }

    #[test]
    fn blank_student_id_is_rejected() {
        assert_eq!(validate_student_id(" S1 ").unwrap(), "S1");
        assert!(matches!(
            validate_student_id("  "),
            Err(Error::Validation(_))
        ));
    }
}
