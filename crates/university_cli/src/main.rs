//! Command-line front end for the university records core.
//!
//! # Responsibility
//! - Open the records database and optionally start file logging.
//! - Expose list, association and remove flows as subcommands.
//! - Print read results as JSON for scripting.

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde_json::Value;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use university_core::db::{open_db, open_db_in_memory};
use university_core::{
    ConfirmDialog, CourseService, FacultyService, ProjectService, RemoveOutcome,
    SqliteCourseRepository, SqliteFacultyRepository, SqliteProjectRepository,
    SqliteStudentRepository, StudentId, StudentService,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "university", version, about = "Manage university records")]
struct Cli {
    /// SQLite database file; an in-memory catalog is used when omitted.
    #[arg(long, env = "UNIVERSITY_DB", global = true)]
    db: Option<PathBuf>,

    #[arg(long, env = "UNIVERSITY_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long, env = "UNIVERSITY_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every record of one kind.
    List { kind: RecordKind },
    /// Replace the research projects a faculty member works on.
    AssignProjects {
        faculty_id: String,
        projects: Vec<String>,
    },
    /// Replace the courses a student is enrolled in.
    Enroll {
        student_id: StudentId,
        courses: Vec<String>,
    },
    /// Remove a record and its associations.
    Remove {
        kind: RecordKind,
        key: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RecordKind {
    Students,
    Courses,
    Faculty,
    Projects,
}

/// Asks on the terminal; an unreadable answer counts as a dismissed prompt.
struct TerminalDialog;

impl ConfirmDialog for TerminalDialog {
    fn confirm_removal(&self, label: &str) -> Option<bool> {
        print!("Remove {label}? [y/N] ");
        io::stdout().flush().ok()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer).ok()?;
        Some(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| university_core::default_log_level());
        university_core::init_logging(level, log_dir)?;
    }

    let mut conn = match cli.db.as_ref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    match cli.command {
        Command::List { kind } => {
            let listing = match kind {
                RecordKind::Students => {
                    let service = StudentService::new(SqliteStudentRepository::try_new(&mut conn)?);
                    serde_json::to_value(service.list_students()?)?
                }
                RecordKind::Courses => {
                    let service = CourseService::new(SqliteCourseRepository::try_new(&mut conn)?);
                    serde_json::to_value(service.list_courses()?)?
                }
                RecordKind::Faculty => {
                    let service =
                        FacultyService::new(SqliteFacultyRepository::try_new(&mut conn)?);
                    serde_json::to_value(service.list_faculty()?)?
                }
                RecordKind::Projects => {
                    let service =
                        ProjectService::new(SqliteProjectRepository::try_new(&mut conn)?);
                    serde_json::to_value(service.list_projects()?)?
                }
            };
            print_json(&listing)?;
        }
        Command::AssignProjects {
            faculty_id,
            projects,
        } => {
            let mut service = FacultyService::new(SqliteFacultyRepository::try_new(&mut conn)?);
            let assigned = service.assign_projects(&faculty_id, &projects)?;
            info!(
                "event=cli_assign_projects module=cli status=ok projects={}",
                assigned.len()
            );
            print_json(&serde_json::to_value(assigned)?)?;
        }
        Command::Enroll {
            student_id,
            courses,
        } => {
            let mut service = StudentService::new(SqliteStudentRepository::try_new(&mut conn)?);
            let enrolled = service.enroll_courses(student_id, &courses)?;
            info!(
                "event=cli_enroll module=cli status=ok courses={}",
                enrolled.len()
            );
            print_json(&serde_json::to_value(enrolled)?)?;
        }
        Command::Remove { kind, key, yes } => {
            let accept_all = |_: &str| Some(true);
            let dialog: &dyn ConfirmDialog = if yes { &accept_all } else { &TerminalDialog };
            let outcome = match kind {
                RecordKind::Students => {
                    let student_id: StudentId = key
                        .parse()
                        .map_err(|err| format!("invalid student id `{key}`: {err}"))?;
                    StudentService::new(SqliteStudentRepository::try_new(&mut conn)?)
                        .remove_student(student_id, dialog)?
                }
                RecordKind::Courses => {
                    CourseService::new(SqliteCourseRepository::try_new(&mut conn)?)
                        .remove_course(&key, dialog)?
                }
                RecordKind::Faculty => {
                    FacultyService::new(SqliteFacultyRepository::try_new(&mut conn)?)
                        .remove_faculty(&key, dialog)?
                }
                RecordKind::Projects => {
                    ProjectService::new(SqliteProjectRepository::try_new(&mut conn)?)
                        .remove_project(&key, dialog)?
                }
            };
            match outcome {
                RemoveOutcome::Removed => println!("removed {key}"),
                RemoveOutcome::Cancelled => println!("kept {key}"),
            }
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Command, RecordKind};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn remove_parses_kind_key_and_yes() {
        let cli = Cli::try_parse_from(["university", "remove", "faculty", "F1", "--yes"]).unwrap();
        match cli.command {
            Command::Remove { kind, key, yes } => {
                assert!(matches!(kind, RecordKind::Faculty));
                assert_eq!(key, "F1");
                assert!(yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn assign_projects_accepts_empty_target_list() {
        let cli = Cli::try_parse_from(["university", "assign-projects", "F1"]).unwrap();
        match cli.command {
            Command::AssignProjects {
                faculty_id,
                projects,
            } => {
                assert_eq!(faculty_id, "F1");
                assert!(projects.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_runs_against_in_memory_catalog() {
        let cli = Cli::try_parse_from(["university", "list", "faculty"]).unwrap();
        run(cli).unwrap();
    }

    #[test]
    fn assign_and_remove_run_against_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("records.sqlite3");
        let db = db.to_str().unwrap();

        let assign =
            Cli::try_parse_from(["university", "--db", db, "assign-projects", "F001", "P1"])
                .unwrap();
        run(assign).unwrap();

        let remove =
            Cli::try_parse_from(["university", "--db", db, "remove", "projects", "P1", "--yes"])
                .unwrap();
        run(remove).unwrap();

        let missing =
            Cli::try_parse_from(["university", "--db", db, "remove", "projects", "P1", "--yes"])
                .unwrap();
        assert!(run(missing).unwrap_err().to_string().contains("not found"));
    }
}
