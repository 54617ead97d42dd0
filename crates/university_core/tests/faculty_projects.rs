use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeSet;
use university_core::db::open_db_in_memory;
use university_core::{
    list_faculty_to_project, FacultyMember, FacultyService, ProjectService, RemoveOutcome,
    ResearchProject, ServiceError, SqliteFacultyRepository, SqliteProjectRepository,
};

fn member(faculty_id: &str, name: &str) -> FacultyMember {
    FacultyMember {
        age: 40,
        gender: "M".to_string(),
        department: "Computer Science".to_string(),
        position: "Professor".to_string(),
        email: format!("{}@university.edu", faculty_id.to_lowercase()),
        office_room_number: "12".to_string(),
        ..FacultyMember::new(faculty_id, name)
    }
}

fn project(project_id: &str, title: &str) -> ResearchProject {
    ResearchProject {
        description: format!("{title} research"),
        supervisor: "Dr. Smith".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        budget: 10_000.0,
        ..ResearchProject::new(project_id, title)
    }
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn seeded_conn() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
        let mut projects = ProjectService::new(repo);
        projects
            .create_project(&project("P6", "Quantum Computing"), &[])
            .unwrap();
        projects
            .create_project(&project("P7", "Artificial Intelligence"), &[])
            .unwrap();
    }
    {
        let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
        let mut faculty = FacultyService::new(repo);
        faculty.create_faculty(&member("F1", "Dr. Smith"), &[]).unwrap();
        faculty
            .create_faculty(&member("F2", "Dr. Johnson"), &[])
            .unwrap();
    }
    conn
}

#[test]
fn reconcile_then_read_back_yields_target_set() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);

    let first = service.assign_projects("F1", &ids(&["P6"])).unwrap();
    assert_eq!(first, set(&["P6"]));

    let second = service.assign_projects("F1", &ids(&["P7", "P6"])).unwrap();
    assert_eq!(second, set(&["P6", "P7"]));
    assert_eq!(service.assigned_projects("F1").unwrap(), set(&["P6", "P7"]));

    let cleared = service.assign_projects("F1", &[]).unwrap();
    assert!(cleared.is_empty());
}

#[test]
fn reconciling_same_set_twice_is_idempotent() {
    let mut conn = seeded_conn();
    {
        let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
        let mut service = FacultyService::new(repo);
        service.assign_projects("F1", &ids(&["P6", "P7"])).unwrap();
        service.assign_projects("F1", &ids(&["P6", "P7"])).unwrap();
    }

    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM faculty_to_project WHERE faculty_id = 'F1';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 2);
}

#[test]
fn reconciling_one_owner_leaves_other_owners_untouched() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);

    service.assign_projects("F2", &ids(&["P6"])).unwrap();
    service.assign_projects("F1", &ids(&["P6", "P7"])).unwrap();
    service.assign_projects("F1", &ids(&["P7"])).unwrap();

    assert_eq!(service.assigned_projects("F2").unwrap(), set(&["P6"]));
    assert_eq!(service.assigned_projects("F1").unwrap(), set(&["P7"]));
}

#[test]
fn project_side_sees_faculty_side_edits() {
    let mut conn = seeded_conn();
    {
        let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
        let mut service = FacultyService::new(repo);
        service.assign_projects("F1", &ids(&["P6"])).unwrap();
        service.assign_projects("F2", &ids(&["P6"])).unwrap();
    }

    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let mut projects = ProjectService::new(repo);
    assert_eq!(projects.assigned_faculty("P6").unwrap(), set(&["F1", "F2"]));

    let after = projects.assign_faculty("P6", &ids(&["F2"])).unwrap();
    assert_eq!(after, set(&["F2"]));
}

#[test]
fn unknown_target_fails_and_keeps_previous_set() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);
    service.assign_projects("F1", &ids(&["P6"])).unwrap();

    let err = service
        .assign_projects("F1", &ids(&["P7", "P404"]))
        .unwrap_err();
    assert!(matches!(err, ServiceError::MissingReference { ref key, .. } if key == "P404"));
    assert_eq!(service.assigned_projects("F1").unwrap(), set(&["P6"]));
}

#[test]
fn update_faculty_saves_fields_and_reconciles_projects() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);
    service.assign_projects("F1", &ids(&["P6"])).unwrap();

    let mut edited = service.get_faculty("F1").unwrap().unwrap();
    edited.position = "Dean".to_string();
    let record = service.update_faculty(&edited, &ids(&["P7"])).unwrap();

    assert_eq!(record.member.position, "Dean");
    assert_eq!(record.projects, set(&["P7"]));
}

#[test]
fn invalid_update_does_not_touch_fields_or_links() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);
    service.assign_projects("F1", &ids(&["P6"])).unwrap();

    let mut edited = service.get_faculty("F1").unwrap().unwrap();
    edited.email = "no-at-sign".to_string();
    edited.position = "Dean".to_string();
    let err = service.update_faculty(&edited, &[]).unwrap_err();

    match err {
        ServiceError::Invalid(validation) => assert_eq!(validation.field, "email"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        service.get_faculty("F1").unwrap().unwrap().position,
        "Professor"
    );
    assert_eq!(service.assigned_projects("F1").unwrap(), set(&["P6"]));
}

#[test]
fn create_faculty_rejects_duplicate_key() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);

    let err = service
        .create_faculty(&member("F1", "Someone Else"), &ids(&["P6"]))
        .unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyExists { ref key, .. } if key == "F1"));
    assert_eq!(
        err.to_string(),
        "FacultyMember with this FacultyID already exists."
    );
    assert_eq!(
        service.get_faculty("F1").unwrap().unwrap().name,
        "Dr. Smith"
    );
    assert!(service.assigned_projects("F1").unwrap().is_empty());
}

#[test]
fn create_faculty_with_projects_commits_links() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);

    let record = service
        .create_faculty(&member("F3", "Dr. Brown"), &ids(&["P6", "P7"]))
        .unwrap();
    assert_eq!(record.projects, set(&["P6", "P7"]));
}

#[test]
fn removing_faculty_purges_join_rows() {
    let mut conn = seeded_conn();
    {
        let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
        let mut service = FacultyService::new(repo);
        service.assign_projects("F1", &ids(&["P6", "P7"])).unwrap();
        service.assign_projects("F2", &ids(&["P6"])).unwrap();

        let outcome = service
            .remove_faculty("F1", &|_: &str| Some(true))
            .unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert!(service.get_faculty("F1").unwrap().is_none());
    }

    let edges = list_faculty_to_project(&conn).unwrap();
    assert!(edges.iter().all(|edge| edge.faculty_id != "F1"));
    assert!(edges
        .iter()
        .any(|edge| edge.faculty_id == "F2" && edge.project_id == "P6"));
}

#[test]
fn removing_project_purges_join_rows() {
    let mut conn = seeded_conn();
    {
        let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
        let mut service = FacultyService::new(repo);
        service.assign_projects("F1", &ids(&["P6", "P7"])).unwrap();
    }
    {
        let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
        let mut projects = ProjectService::new(repo);
        let outcome = projects.remove_project("P6", &|_: &str| None).unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed);
    }

    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let service = FacultyService::new(repo);
    assert_eq!(service.assigned_projects("F1").unwrap(), set(&["P7"]));
}

#[test]
fn declined_removal_keeps_member_and_links() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);
    service.assign_projects("F1", &ids(&["P6"])).unwrap();

    let outcome = service
        .remove_faculty("F1", &|label: &str| {
            assert_eq!(label, "Dr. Smith");
            Some(false)
        })
        .unwrap();

    assert_eq!(outcome, RemoveOutcome::Cancelled);
    assert!(service.get_faculty("F1").unwrap().is_some());
    assert_eq!(service.assigned_projects("F1").unwrap(), set(&["P6"]));
}

#[test]
fn removing_unknown_faculty_is_not_found() {
    let mut conn = seeded_conn();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let mut service = FacultyService::new(repo);

    let err = service
        .remove_faculty("F404", &|_: &str| Some(true))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test]
fn seeded_associations_are_readable() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteFacultyRepository::try_new(&mut conn).unwrap();
    let service = FacultyService::new(repo);
    assert_eq!(service.assigned_projects("F002").unwrap(), set(&["P2", "P4"]));
    assert!(service.assigned_projects("F001").unwrap().is_empty());
}

#[test]
fn create_project_rejects_duplicate_key() {
    let mut conn = seeded_conn();
    let repo = SqliteProjectRepository::try_new(&mut conn).unwrap();
    let mut projects = ProjectService::new(repo);

    let err = projects
        .create_project(&project("P6", "Duplicate"), &[])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Research Project with this Project ID already exists."
    );
}
