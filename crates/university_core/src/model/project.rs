//! Research project record.
//!
//! # Invariants
//! - `end_date` must not precede `start_date`.
//! - `budget` must be strictly positive before any save.

use crate::model::validation::{required, FieldValidator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Research project key, e.g. `P1`.
pub type ProjectId = String;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchProject {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    /// Free-form names; faculty assignment lives in `faculty_to_project`.
    pub team_members: Vec<String>,
    pub supervisor: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
}

impl ResearchProject {
    /// Creates a project draft with the given key and title.
    pub fn new(project_id: impl Into<ProjectId>, title: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn display_label(&self) -> String {
        self.title.clone()
    }
}

impl FieldValidator for ResearchProject {
    const FIELDS: &'static [&'static str] = &[
        "project_id",
        "title",
        "description",
        "supervisor",
        "start_date",
        "end_date",
        "budget",
    ];

    fn field_error(&self, field: &str) -> String {
        match field {
            "project_id" => required(&self.project_id, "Project ID is Required"),
            "title" => required(&self.title, "Title is Required"),
            "description" => required(&self.description, "Description is Required"),
            "supervisor" => required(&self.supervisor, "Supervisor is Required"),
            "start_date" if self.start_date.is_none() => "Start Date is Required".to_string(),
            "end_date" => match (self.start_date, self.end_date) {
                (_, None) => "End Date is Required".to_string(),
                (Some(start), Some(end)) if end < start => {
                    "End Date must not be earlier than Start Date".to_string()
                }
                _ => String::new(),
            },
            // NaN fails the comparison and is rejected too.
            "budget" if !(self.budget > 0.0) => "Budget must be greater than 0".to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResearchProject;
    use crate::model::validation::FieldValidator;
    use chrono::NaiveDate;

    fn complete_project() -> ResearchProject {
        ResearchProject {
            description: "Graph algorithms at scale".to_string(),
            supervisor: "Dr. Jan Kowalski".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            budget: 1000.0,
            ..ResearchProject::new("P9", "Graphs")
        }
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let mut project = complete_project();
        project.end_date = NaiveDate::from_ymd_opt(2023, 12, 31);
        assert_eq!(
            project.field_error("end_date"),
            "End Date must not be earlier than Start Date"
        );
        assert!(!project.is_savable());
    }

    #[test]
    fn same_day_range_is_allowed() {
        let mut project = complete_project();
        project.end_date = project.start_date;
        assert!(project.is_savable());
    }

    #[test]
    fn budget_must_be_positive() {
        let mut project = complete_project();
        project.budget = 0.0;
        assert_eq!(project.field_error("budget"), "Budget must be greater than 0");
        project.budget = f64::NAN;
        assert!(!project.is_savable());
    }
}
