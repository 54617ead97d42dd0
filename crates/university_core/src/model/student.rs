//! Student record.
//!
//! # Invariants
//! - `student_id` is assigned by the store on create; `0` marks an unsaved draft.
//! - `pesel` must carry a valid checksum before any save.

use crate::model::validation::{is_valid_pesel, required, FieldValidator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned student key.
pub type StudentId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: StudentId,
    pub name: String,
    pub last_name: String,
    /// Polish national identification number.
    pub pesel: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: String,
    pub place_of_birth: String,
    pub place_of_residence: String,
    pub address_line1: String,
    /// Optional second address line; never validated.
    pub address_line2: String,
    pub postal_code: String,
}

impl Student {
    /// Creates an unsaved student draft.
    pub fn new(name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Label shown in confirmation prompts.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

impl FieldValidator for Student {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "last_name",
        "pesel",
        "birth_date",
        "gender",
        "place_of_birth",
        "place_of_residence",
        "address_line1",
        "postal_code",
    ];

    fn field_error(&self, field: &str) -> String {
        match field {
            "name" => required(&self.name, "Name is Required"),
            "last_name" => required(&self.last_name, "Last Name is Required"),
            "pesel" => {
                if self.pesel.trim().is_empty() {
                    "PESEL is Required".to_string()
                } else if !is_valid_pesel(self.pesel.trim()) {
                    "PESEL is Invalid".to_string()
                } else {
                    String::new()
                }
            }
            "birth_date" => match self.birth_date {
                Some(_) => String::new(),
                None => "BirthDate is Required".to_string(),
            },
            "gender" => required(&self.gender, "Gender is Required"),
            "place_of_birth" => required(&self.place_of_birth, "Place of Birth is Required"),
            "place_of_residence" => {
                required(&self.place_of_residence, "Place of Residence is Required")
            }
            "address_line1" => required(&self.address_line1, "Address Line 1 is Required"),
            "postal_code" => required(&self.postal_code, "Postal Code is Required"),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Student;
    use crate::model::validation::FieldValidator;
    use chrono::NaiveDate;

    fn complete_student() -> Student {
        Student {
            pesel: "90010112349".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
            gender: "F".to_string(),
            place_of_birth: "Kraków".to_string(),
            place_of_residence: "Gdańsk".to_string(),
            address_line1: "Długa 1".to_string(),
            postal_code: "80-001".to_string(),
            ..Student::new("Ewa", "Kowalska")
        }
    }

    #[test]
    fn complete_student_is_savable() {
        assert!(complete_student().is_savable());
        assert!(complete_student().field_errors().is_empty());
    }

    #[test]
    fn address_line2_is_optional() {
        let student = complete_student();
        assert!(student.address_line2.is_empty());
        assert_eq!(student.field_error("address_line2"), "");
    }

    #[test]
    fn pesel_reports_required_then_invalid() {
        let mut student = complete_student();
        student.pesel.clear();
        assert_eq!(student.field_error("pesel"), "PESEL is Required");

        student.pesel = "PESEL1".to_string();
        assert_eq!(student.field_error("pesel"), "PESEL is Invalid");
        let err = student.validate().unwrap_err();
        assert_eq!(err.field, "pesel");
    }

    #[test]
    fn missing_birth_date_blocks_save() {
        let mut student = complete_student();
        student.birth_date = None;
        assert!(!student.is_savable());
        assert_eq!(student.field_error("birth_date"), "BirthDate is Required");
    }
}
