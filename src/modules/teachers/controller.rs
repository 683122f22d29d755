use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use control_escolar_core::{AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::teachers::model::{
    CreateTeacherDto, DeletedResponse, IdQuery, Teacher, TeacherCreatedResponse,
    TeacherUpdatedResponse, UpdateTeacherDto,
};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List teachers with an active account
#[utoipa::path(
    get,
    path = "/api/maestros/all",
    responses(
        (status = 200, description = "Active teachers ordered by id", body = Vec<Teacher>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Maestros",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Teacher>>, AppError> {
    let teachers = TeacherService::get_active_teachers(&state.db).await?;
    Ok(Json(teachers))
}

/// Get a teacher by id
#[utoipa::path(
    get,
    path = "/api/maestros",
    params(IdQuery),
    responses(
        (status = 200, description = "Teacher details", body = Teacher),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Maestros",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::get_teacher_by_id(&state.db, query.id).await?;
    Ok(Json(teacher))
}

/// Register a teacher together with its account
///
/// Open endpoint: no token required.
#[utoipa::path(
    post,
    path = "/api/maestros",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher registered", body = TeacherCreatedResponse),
        (status = 400, description = "Malformed body, empty required field or email already taken", body = ErrorResponse),
    ),
    tag = "Maestros"
)]
#[instrument(skip(state))]
pub async fn create_teacher(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<TeacherCreatedResponse>), AppError> {
    let teacher_id = TeacherService::create_teacher(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(TeacherCreatedResponse {
            maestro_created_id: teacher_id,
        }),
    ))
}

/// Update a teacher and the names on its account
#[utoipa::path(
    put,
    path = "/api/maestros",
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherUpdatedResponse),
        (status = 400, description = "Malformed body or empty required field", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
    ),
    tag = "Maestros",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_teacher(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<TeacherUpdatedResponse>, AppError> {
    let teacher = TeacherService::update_teacher(&state.db, dto).await?;

    Ok(Json(TeacherUpdatedResponse {
        message: "Teacher updated successfully".to_string(),
        maestro: teacher,
    }))
}

/// Delete a teacher and its account
#[utoipa::path(
    delete,
    path = "/api/maestros",
    params(IdQuery),
    responses(
        (status = 200, description = "Teacher deleted", body = DeletedResponse),
        (status = 400, description = "Deletion failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Maestros",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<DeletedResponse>, AppError> {
    TeacherService::delete_teacher(&state.db, query.id).await?;
    Ok(Json(DeletedResponse::new("Teacher deleted")))
}
