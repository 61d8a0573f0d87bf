use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use coursekit_core::{AppError, PaginationParams};
use coursekit_models::{
    Course, CourseId, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
};

use crate::middleware::auth::{MaybeAuthUser, RequireCoursesManage};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/courses",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of courses visible to the caller", body = PaginatedCoursesResponse),
        (status = 401, description = "Invalid token")
    ),
    tag = "Courses",
    security((), ("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    auth_user: MaybeAuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedCoursesResponse>, AppError> {
    let courses =
        CourseService::list_courses(&state.db, auth_user.visibility(), &pagination).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security((), ("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    auth_user: MaybeAuthUser,
    Path(id): Path<CourseId>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id, auth_user.visibility()).await?;
    Ok(Json(course))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires courses:manage permission"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireCoursesManage(_auth_user): RequireCoursesManage,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires courses:manage permission"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireCoursesManage(_auth_user): RequireCoursesManage,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course deleted with its modules and pages"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires courses:manage permission"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireCoursesManage(_auth_user): RequireCoursesManage,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
