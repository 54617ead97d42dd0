//! Course record.
//!
//! # Invariants
//! - `course_code` is the unique, immutable course key.
//! - `credits` must be strictly positive before any save.

use crate::model::validation::{required, FieldValidator};
use serde::{Deserialize, Serialize};

/// Course key, e.g. `C1`.
pub type CourseCode = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_code: CourseCode,
    pub title: String,
    pub instructor: String,
    pub schedule: String,
    pub description: String,
    pub credits: i32,
    pub department: String,
    /// Free-form prerequisite names.
    pub prerequisites: Vec<String>,
}

impl Course {
    /// Creates a course draft with the given key and title.
    pub fn new(course_code: impl Into<CourseCode>, title: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn display_label(&self) -> String {
        self.title.clone()
    }
}

impl FieldValidator for Course {
    const FIELDS: &'static [&'static str] = &[
        "course_code",
        "title",
        "schedule",
        "instructor",
        "description",
        "credits",
        "department",
    ];

    fn field_error(&self, field: &str) -> String {
        match field {
            "course_code" => required(&self.course_code, "Course code is required."),
            "title" => required(&self.title, "Title is required."),
            "schedule" => required(&self.schedule, "Schedule is required."),
            "instructor" => required(&self.instructor, "Instructor is required."),
            "description" => required(&self.description, "Description is required."),
            "credits" if self.credits <= 0 => "Credits must be greater than 0.".to_string(),
            "department" => required(&self.department, "Department is required."),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Course;
    use crate::model::validation::FieldValidator;

    #[test]
    fn credits_must_be_positive() {
        let mut course = Course {
            instructor: "Jan Nowak".to_string(),
            schedule: "Winter 2024".to_string(),
            description: "Basic Chemistry".to_string(),
            credits: 0,
            department: "Chemistry".to_string(),
            ..Course::new("C9", "Chemia")
        };
        assert_eq!(course.field_error("credits"), "Credits must be greater than 0.");
        assert!(!course.is_savable());

        course.credits = 3;
        assert!(course.is_savable());
    }

    #[test]
    fn blank_title_is_reported_first_after_code() {
        let course = Course::new("C9", " ");
        let errors = course.field_errors();
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "Title is required.");
    }
}
