//! Student repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `student_id` is assigned by SQLite; drafts carry `0` until created.
//! - Student writes and course-enrollment reconciliation commit together.

use crate::model::course::CourseCode;
use crate::model::student::{Student, StudentId};
use crate::model::validation::FieldValidator;
use crate::repo::association::{
    load_links, purge_links, reconcile_links, replace_links, STUDENT_COURSES,
};
use crate::repo::ensure_tables;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;

const STUDENT_SELECT_SQL: &str = "SELECT
    student_id,
    name,
    last_name,
    pesel,
    birth_date,
    gender,
    place_of_birth,
    place_of_residence,
    address_line1,
    address_line2,
    postal_code
FROM students";

const ENTITY: &str = "student";

/// Repository interface for students and their course enrollments.
pub trait StudentRepository {
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn get_student(&self, student_id: StudentId) -> RepoResult<Option<Student>>;
    /// Inserts a student, ignoring `student.student_id`, and returns the new key.
    fn create_student(&mut self, student: &Student, courses: &[CourseCode])
        -> RepoResult<StudentId>;
    fn update_student(&mut self, student: &Student, courses: &[CourseCode]) -> RepoResult<()>;
    fn delete_student(&mut self, student_id: StudentId) -> RepoResult<()>;
    fn enrolled_courses(&self, student_id: StudentId) -> RepoResult<BTreeSet<CourseCode>>;
    fn replace_courses(&mut self, student_id: StudentId, courses: &[CourseCode]) -> RepoResult<()>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["students", "course_students"])?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY student_id ASC;"))?;
        let students = stmt
            .query_map([], parse_student_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(students)
    }

    fn get_student(&self, student_id: StudentId) -> RepoResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE student_id = ?1;"),
                [student_id],
                parse_student_row,
            )
            .optional()?;
        Ok(student)
    }

    fn create_student(
        &mut self,
        student: &Student,
        courses: &[CourseCode],
    ) -> RepoResult<StudentId> {
        student.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO students (
                name,
                last_name,
                pesel,
                birth_date,
                gender,
                place_of_birth,
                place_of_residence,
                address_line1,
                address_line2,
                postal_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                student.name.as_str(),
                student.last_name.as_str(),
                student.pesel.trim(),
                student.birth_date,
                student.gender.as_str(),
                student.place_of_birth.as_str(),
                student.place_of_residence.as_str(),
                student.address_line1.as_str(),
                student.address_line2.as_str(),
                student.postal_code.as_str(),
            ],
        )?;
        let student_id = tx.last_insert_rowid();

        replace_links(&tx, &STUDENT_COURSES, &student_id, courses)?;
        tx.commit()?;
        Ok(student_id)
    }

    fn update_student(&mut self, student: &Student, courses: &[CourseCode]) -> RepoResult<()> {
        student.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE students
             SET
                name = ?2,
                last_name = ?3,
                pesel = ?4,
                birth_date = ?5,
                gender = ?6,
                place_of_birth = ?7,
                place_of_residence = ?8,
                address_line1 = ?9,
                address_line2 = ?10,
                postal_code = ?11
             WHERE student_id = ?1;",
            params![
                student.student_id,
                student.name.as_str(),
                student.last_name.as_str(),
                student.pesel.trim(),
                student.birth_date,
                student.gender.as_str(),
                student.place_of_birth.as_str(),
                student.place_of_residence.as_str(),
                student.address_line1.as_str(),
                student.address_line2.as_str(),
                student.postal_code.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: student.student_id.to_string(),
            });
        }

        replace_links(&tx, &STUDENT_COURSES, &student.student_id, courses)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_student(&mut self, student_id: StudentId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        purge_links(&tx, &STUDENT_COURSES, &student_id)?;
        let removed = tx.execute("DELETE FROM students WHERE student_id = ?1;", [student_id])?;
        if removed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: student_id.to_string(),
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn enrolled_courses(&self, student_id: StudentId) -> RepoResult<BTreeSet<CourseCode>> {
        load_links(self.conn, &STUDENT_COURSES, &student_id)
    }

    fn replace_courses(&mut self, student_id: StudentId, courses: &[CourseCode]) -> RepoResult<()> {
        reconcile_links(self.conn, &STUDENT_COURSES, &student_id, courses)
    }
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        student_id: row.get("student_id")?,
        name: row.get("name")?,
        last_name: row.get("last_name")?,
        pesel: row.get("pesel")?,
        birth_date: row.get("birth_date")?,
        gender: row.get("gender")?,
        place_of_birth: row.get("place_of_birth")?,
        place_of_residence: row.get("place_of_residence")?,
        address_line1: row.get("address_line1")?,
        address_line2: row.get("address_line2")?,
        postal_code: row.get("postal_code")?,
    })
}
