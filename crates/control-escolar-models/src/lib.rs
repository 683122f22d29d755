//! # Control Escolar Models
//!
//! Data structures used throughout the API: database rows, request DTOs and
//! response bodies.
//!
//! - [`auth`]: Login request and response
//! - [`common`]: Query and acknowledgement types shared by resources
//! - [`courses`]: Course ("materia") models
//! - [`teachers`]: Teacher ("maestro") models
//! - [`users`]: Account models and well-known role-group names
//!
//! Wire names follow the Spanish keys the web client uses (`id_trabajador`,
//! `nombre_materia`, `dias_json`, ...); Rust field names are English.

pub mod auth;
pub mod common;
pub mod courses;
pub mod teachers;
pub mod users;

pub use auth::{LoginRequest, LoginResponse};
pub use common::{DeletedResponse, IdQuery};
pub use courses::{
    Course, CourseFields, CourseInput, CourseRow, CourseSavedResponse, UpdateCourseDto,
};
pub use teachers::{
    CreateTeacherDto, Teacher, TeacherCreatedResponse, TeacherRow, TeacherUpdatedResponse,
    UpdateTeacherDto,
};
pub use users::{UserSummary, role_groups};
