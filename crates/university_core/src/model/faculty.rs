//! Faculty member record and the faculty↔project join entity.

use crate::model::project::ProjectId;
use crate::model::validation::{required, FieldValidator};
use serde::{Deserialize, Serialize};

/// Faculty member key, e.g. `F001`.
pub type FacultyId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyMember {
    pub faculty_id: FacultyId,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub department: String,
    pub position: String,
    pub email: String,
    pub office_room_number: String,
}

impl FacultyMember {
    /// Creates a faculty member draft with the given key and name.
    pub fn new(faculty_id: impl Into<FacultyId>, name: impl Into<String>) -> Self {
        Self {
            faculty_id: faculty_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn display_label(&self) -> String {
        self.name.clone()
    }
}

impl FieldValidator for FacultyMember {
    const FIELDS: &'static [&'static str] = &[
        "faculty_id",
        "name",
        "age",
        "gender",
        "department",
        "position",
        "email",
        "office_room_number",
    ];

    fn field_error(&self, field: &str) -> String {
        match field {
            "faculty_id" => required(&self.faculty_id, "Faculty ID is Required"),
            "name" => required(&self.name, "Name is Required"),
            "age" if self.age <= 0 => "Age must be greater than zero".to_string(),
            "gender" => required(&self.gender, "Gender is Required"),
            "department" => required(&self.department, "Department is Required"),
            "position" => required(&self.position, "Position is Required"),
            "email" => {
                if self.email.trim().is_empty() {
                    "Email is Required".to_string()
                } else if !self.email.contains('@') {
                    "Email is Invalid".to_string()
                } else {
                    String::new()
                }
            }
            "office_room_number" => {
                required(&self.office_room_number, "Office Room Number is Required")
            }
            _ => String::new(),
        }
    }
}

/// One faculty↔project edge, keyed by both parents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacultyToProject {
    pub faculty_id: FacultyId,
    pub project_id: ProjectId,
}

#[cfg(test)]
mod tests {
    use super::FacultyMember;
    use crate::model::validation::FieldValidator;

    fn complete_member() -> FacultyMember {
        FacultyMember {
            age: 41,
            gender: "F".to_string(),
            department: "Physics".to_string(),
            position: "Lecturer".to_string(),
            email: "maria@university.edu".to_string(),
            office_room_number: "404".to_string(),
            ..FacultyMember::new("F010", "Maria Zielińska")
        }
    }

    #[test]
    fn email_needs_at_sign() {
        let mut member = complete_member();
        member.email = "maria.university.edu".to_string();
        assert_eq!(member.field_error("email"), "Email is Invalid");

        member.email = String::new();
        assert_eq!(member.field_error("email"), "Email is Required");
    }

    #[test]
    fn age_must_be_positive() {
        let mut member = complete_member();
        member.age = 0;
        let err = member.validate().unwrap_err();
        assert_eq!(err.field, "age");
        assert_eq!(err.message, "Age must be greater than zero");
    }

    #[test]
    fn unknown_field_is_not_checked() {
        assert_eq!(complete_member().field_error("nickname"), "");
        assert!(complete_member().is_savable());
    }
}
