//! Course and student services: validation in front of the store.

mod course;
mod student;
mod validation;
pub use course::CourseService;
pub use student::StudentService;
pub use validation::{unknown_students, RequestValidator};
