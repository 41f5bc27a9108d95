//! Course and student records as exposed over the API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type CourseId = i64;
pub type StudentId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

/// Course representation: `students` holds member ids in association order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub students: Vec<StudentId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,
    pub students: Vec<StudentId>,
}

/// Changes applied to an existing course. `None` leaves a field untouched;
/// `Some(students)` replaces the whole membership set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseChanges {
    pub name: Option<String>,
    pub students: Option<Vec<StudentId>>,
}

impl CourseChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.students.is_none()
    }
}

/// Exact-match list filters. Absent fields do not constrain the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub id: Option<CourseId>,
    pub name: Option<String>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        self.id.map_or(true, |id| course.id == id)
            && self.name.as_deref().map_or(true, |name| course.name == name)
    }
}
