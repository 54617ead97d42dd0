//! Course repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Course writes and student-enrollment reconciliation commit together.
//! - `prerequisites` is stored as one comma-joined column.

use crate::model::course::{Course, CourseCode};
use crate::model::student::StudentId;
use crate::model::validation::FieldValidator;
use crate::repo::association::{
    load_links, purge_links, reconcile_links, replace_links, COURSE_STUDENTS,
};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::{ensure_tables, join_list, split_list};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;

const COURSE_SELECT_SQL: &str = "SELECT
    course_code,
    title,
    instructor,
    schedule,
    description,
    credits,
    department,
    prerequisites
FROM courses";

const ENTITY: &str = "course";
/// Names used in the duplicate-key rejection shown by the add form.
const FORM_ENTITY: &str = "Course";
const FORM_KEY_LABEL: &str = "Course_Code";

/// Repository interface for courses and their enrolled students.
pub trait CourseRepository {
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    fn get_course(&self, course_code: &str) -> RepoResult<Option<Course>>;
    fn create_course(&mut self, course: &Course, students: &[StudentId]) -> RepoResult<()>;
    fn update_course(&mut self, course: &Course, students: &[StudentId]) -> RepoResult<()>;
    fn delete_course(&mut self, course_code: &str) -> RepoResult<()>;
    fn enrolled_students(&self, course_code: &str) -> RepoResult<BTreeSet<StudentId>>;
    fn replace_students(&mut self, course_code: &str, students: &[StudentId]) -> RepoResult<()>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["courses", "course_students"])?;
        Ok(Self { conn })
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} ORDER BY course_code ASC;"))?;
        let courses = stmt
            .query_map([], parse_course_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    fn get_course(&self, course_code: &str) -> RepoResult<Option<Course>> {
        let course = self
            .conn
            .query_row(
                &format!("{COURSE_SELECT_SQL} WHERE course_code = ?1;"),
                [course_code],
                parse_course_row,
            )
            .optional()?;
        Ok(course)
    }

    fn create_course(&mut self, course: &Course, students: &[StudentId]) -> RepoResult<()> {
        course.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO courses (
                course_code,
                title,
                instructor,
                schedule,
                description,
                credits,
                department,
                prerequisites
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                course.course_code.as_str(),
                course.title.as_str(),
                course.instructor.as_str(),
                course.schedule.as_str(),
                course.description.as_str(),
                course.credits,
                course.department.as_str(),
                join_list(&course.prerequisites),
            ],
        )?;
        if inserted == 0 {
            return Err(RepoError::AlreadyExists {
                entity: FORM_ENTITY,
                key_label: FORM_KEY_LABEL,
                key: course.course_code.clone(),
            });
        }

        replace_links(&tx, &COURSE_STUDENTS, course.course_code.as_str(), students)?;
        tx.commit()?;
        Ok(())
    }

    fn update_course(&mut self, course: &Course, students: &[StudentId]) -> RepoResult<()> {
        course.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE courses
             SET
                title = ?2,
                instructor = ?3,
                schedule = ?4,
                description = ?5,
                credits = ?6,
                department = ?7,
                prerequisites = ?8
             WHERE course_code = ?1;",
            params![
                course.course_code.as_str(),
                course.title.as_str(),
                course.instructor.as_str(),
                course.schedule.as_str(),
                course.description.as_str(),
                course.credits,
                course.department.as_str(),
                join_list(&course.prerequisites),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: course.course_code.clone(),
            });
        }

        replace_links(&tx, &COURSE_STUDENTS, course.course_code.as_str(), students)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_course(&mut self, course_code: &str) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        purge_links(&tx, &COURSE_STUDENTS, course_code)?;
        let removed = tx.execute("DELETE FROM courses WHERE course_code = ?1;", [course_code])?;
        if removed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: course_code.to_string(),
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn enrolled_students(&self, course_code: &str) -> RepoResult<BTreeSet<StudentId>> {
        load_links(self.conn, &COURSE_STUDENTS, course_code)
    }

    fn replace_students(&mut self, course_code: &str, students: &[StudentId]) -> RepoResult<()> {
        reconcile_links(self.conn, &COURSE_STUDENTS, course_code, students)
    }
}

fn parse_course_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    let prerequisites: String = row.get("prerequisites")?;
    Ok(Course {
        course_code: row.get::<_, CourseCode>("course_code")?,
        title: row.get("title")?,
        instructor: row.get("instructor")?,
        schedule: row.get("schedule")?,
        description: row.get("description")?,
        credits: row.get("credits")?,
        department: row.get("department")?,
        prerequisites: split_list(&prerequisites),
    })
}
