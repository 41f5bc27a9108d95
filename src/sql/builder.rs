//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the course tables.

use super::params::PgBindValue;
use crate::model::{CourseFilter, CourseId, StudentId};
use chrono::NaiveDate;

pub const COURSES_TABLE: &str = "courses";
pub const STUDENTS_TABLE: &str = "students";
pub const COURSE_STUDENTS_TABLE: &str = "course_students";

const COURSE_ALIAS: &str = "c";

/// Quote identifier for PostgreSQL (safe: only from the constants above).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<PgBindValue>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }
}

/// Course columns plus member ids aggregated from the join table in association order.
fn course_column_list() -> String {
    let cs = "cs";
    format!(
        "{a}.{id}, {a}.{name}, COALESCE((SELECT array_agg({cs}.{student_id} ORDER BY {cs}.{id}) \
         FROM {join} {cs} WHERE {cs}.{course_id} = {a}.{id}), '{{}}') AS {students}",
        a = COURSE_ALIAS,
        cs = cs,
        id = quoted("id"),
        name = quoted("name"),
        student_id = quoted("student_id"),
        course_id = quoted("course_id"),
        join = quoted(COURSE_STUDENTS_TABLE),
        students = quoted("students"),
    )
}

fn student_column_list() -> String {
    ["id", "name", "birth_date"]
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT courses with optional exact-match filters, ORDER BY id.
pub fn select_courses(filter: &CourseFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    if let Some(id) = filter.id {
        let n = q.push_param(id);
        where_parts.push(format!("{}.{} = ${}", COURSE_ALIAS, quoted("id"), n));
    }
    if let Some(name) = filter.name.as_deref() {
        let n = q.push_param(name);
        where_parts.push(format!("{}.{} = ${}", COURSE_ALIAS, quoted("name"), n));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {} {}{} ORDER BY {}.{}",
        course_column_list(),
        quoted(COURSES_TABLE),
        COURSE_ALIAS,
        where_clause,
        COURSE_ALIAS,
        quoted("id")
    );
    q
}

pub fn select_course_by_id(id: CourseId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} {} WHERE {}.{} = ${}",
        course_column_list(),
        quoted(COURSES_TABLE),
        COURSE_ALIAS,
        COURSE_ALIAS,
        quoted("id"),
        n
    );
    q
}

/// Row lock on a course, used before rewriting its membership.
pub fn lock_course(id: CourseId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${} FOR UPDATE",
        quoted("id"),
        quoted(COURSES_TABLE),
        quoted("id"),
        n
    );
    q
}

pub fn insert_course(name: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(name);
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES (${}) RETURNING {}",
        quoted(COURSES_TABLE),
        quoted("name"),
        n,
        quoted("id")
    );
    q
}

pub fn update_course_name(id: CourseId, name: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let name_param = q.push_param(name);
    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} = ${} WHERE {} = ${} RETURNING {}",
        quoted(COURSES_TABLE),
        quoted("name"),
        name_param,
        quoted("id"),
        id_param,
        quoted("id")
    );
    q
}

pub fn delete_course(id: CourseId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        quoted(COURSES_TABLE),
        quoted("id"),
        n,
        quoted("id")
    );
    q
}

pub fn clear_course_students(course_id: CourseId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(course_id);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(COURSE_STUDENTS_TABLE),
        quoted("course_id"),
        n
    );
    q
}

/// Multi-row INSERT into the join table; rows are numbered in the order given.
/// Caller must not pass an empty slice.
pub fn insert_course_students(course_id: CourseId, students: &[StudentId]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let course_param = q.push_param(course_id);
    let rows: Vec<String> = students
        .iter()
        .map(|s| {
            let n = q.push_param(*s);
            format!("(${}, ${})", course_param, n)
        })
        .collect();
    q.sql = format!(
        "INSERT INTO {} ({}, {}) VALUES {}",
        quoted(COURSE_STUDENTS_TABLE),
        quoted("course_id"),
        quoted("student_id"),
        rows.join(", ")
    );
    q
}

pub fn select_students() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        student_column_list(),
        quoted(STUDENTS_TABLE),
        quoted("id")
    );
    q
}

pub fn select_student_by_id(id: StudentId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        student_column_list(),
        quoted(STUDENTS_TABLE),
        quoted("id"),
        n
    );
    q
}

/// Ids from `ids` that exist in the students table.
pub fn select_existing_student_ids(ids: &[StudentId]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(ids);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ANY(${})",
        quoted("id"),
        quoted(STUDENTS_TABLE),
        quoted("id"),
        n
    );
    q
}

pub fn insert_student(name: &str, birth_date: Option<NaiveDate>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let name_param = q.push_param(name);
    let date_param = q.push_param(birth_date);
    q.sql = format!(
        "INSERT INTO {} ({}, {}) VALUES (${}, ${}) RETURNING {}",
        quoted(STUDENTS_TABLE),
        quoted("name"),
        quoted("birth_date"),
        name_param,
        date_param,
        student_column_list()
    );
    q
}

pub fn delete_student(id: StudentId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        quoted(STUDENTS_TABLE),
        quoted("id"),
        n,
        quoted("id")
    );
    q
}
