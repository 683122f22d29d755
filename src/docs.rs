use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use control_escolar_core::ErrorResponse;
use control_escolar_models::{
    Course, CourseInput, CourseSavedResponse, CreateTeacherDto, DeletedResponse, LoginRequest,
    LoginResponse, Teacher, TeacherCreatedResponse, TeacherUpdatedResponse, UpdateCourseDto,
    UpdateTeacherDto, UserSummary,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UserSummary,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            TeacherCreatedResponse,
            TeacherUpdatedResponse,
            Course,
            CourseInput,
            UpdateCourseDto,
            CourseSavedResponse,
            DeletedResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and token issuance"),
        (name = "Maestros", description = "Teacher management endpoints"),
        (name = "Materias", description = "Course management endpoints")
    ),
    info(
        title = "Control Escolar API",
        version = "0.1.0",
        description = "School administration backend for teachers and courses, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
