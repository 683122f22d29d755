use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use control_escolar_core::{AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::courses::model::{
    Course, CourseInput, CourseSavedResponse, DeletedResponse, IdQuery, UpdateCourseDto,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::JsonBody;

/// List all courses
#[utoipa::path(
    get,
    path = "/api/materias/all",
    responses(
        (status = 200, description = "Courses ordered by id", body = Vec<Course>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Materias",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::get_courses(&state.db).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/materias",
    params(IdQuery),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Materias",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course_by_id(&state.db, query.id).await?;
    Ok(Json(course))
}

/// Register a course, optionally linked to a teacher
#[utoipa::path(
    post,
    path = "/api/materias",
    request_body = CourseInput,
    responses(
        (status = 201, description = "Course registered", body = CourseSavedResponse),
        (status = 400, description = "Missing field, unknown teacher or integrity violation", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    ),
    tag = "Materias",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    JsonBody(input): JsonBody<CourseInput>,
) -> Result<(StatusCode, Json<CourseSavedResponse>), AppError> {
    let course = CourseService::create_course(&state.db, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseSavedResponse {
            message: "Course registered successfully".to_string(),
            materia: course,
        }),
    ))
}

/// Overwrite a course
#[utoipa::path(
    put,
    path = "/api/materias",
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseSavedResponse),
        (status = 400, description = "Missing field, unknown teacher or integrity violation", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Materias",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    JsonBody(dto): JsonBody<UpdateCourseDto>,
) -> Result<Json<CourseSavedResponse>, AppError> {
    let course = CourseService::update_course(&state.db, dto).await?;

    Ok(Json(CourseSavedResponse {
        message: "Course updated successfully".to_string(),
        materia: course,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/materias",
    params(IdQuery),
    responses(
        (status = 200, description = "Course deleted", body = DeletedResponse),
        (status = 400, description = "Deletion failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Materias",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<DeletedResponse>, AppError> {
    CourseService::delete_course(&state.db, query.id).await?;
    Ok(Json(DeletedResponse::new("Course deleted")))
}
