use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use coursekit_core::AppError;
use coursekit_models::{
    CourseId, CourseModule, CreateModuleDto, ModuleId, ModulePositionUpdate, ReorderResponse,
    UpdateModuleDto,
};

use crate::middleware::auth::{MaybeAuthUser, RequireModulesManage};
use crate::modules::course_modules::service::ModuleService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/courses/{id}/modules",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Modules ordered by position", body = Vec<CourseModule>),
        (status = 401, description = "Invalid token")
    ),
    tag = "Modules",
    security((), ("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course_modules(
    State(state): State<AppState>,
    auth_user: MaybeAuthUser,
    Path(course_id): Path<CourseId>,
) -> Result<Json<Vec<CourseModule>>, AppError> {
    let modules =
        ModuleService::list_modules(&state.db, course_id, auth_user.visibility()).await?;
    Ok(Json(modules))
}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/modules",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    request_body = CreateModuleDto,
    responses(
        (status = 201, description = "Module created", body = CourseModule),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires modules:manage permission"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_module(
    State(state): State<AppState>,
    RequireModulesManage(_auth_user): RequireModulesManage,
    Path(course_id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<CreateModuleDto>,
) -> Result<(StatusCode, Json<CourseModule>), AppError> {
    let module = ModuleService::create_module(&state.db, course_id, dto).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

#[utoipa::path(
    put,
    path = "/api/modules/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Module ID")
    ),
    request_body = UpdateModuleDto,
    responses(
        (status = 200, description = "Module updated", body = CourseModule),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires modules:manage permission"),
        (status = 404, description = "Module not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_module(
    State(state): State<AppState>,
    RequireModulesManage(_auth_user): RequireModulesManage,
    Path(id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<UpdateModuleDto>,
) -> Result<Json<CourseModule>, AppError> {
    let module = ModuleService::update_module(&state.db, id, dto).await?;
    Ok(Json(module))
}

#[utoipa::path(
    delete,
    path = "/api/modules/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Module ID")
    ),
    responses(
        (status = 204, description = "Module deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires modules:manage permission"),
        (status = 404, description = "Module not found")
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_module(
    State(state): State<AppState>,
    RequireModulesManage(_auth_user): RequireModulesManage,
    Path(id): Path<ModuleId>,
) -> Result<StatusCode, AppError> {
    ModuleService::delete_module(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/modules/positions",
    request_body = Vec<ModulePositionUpdate>,
    responses(
        (status = 200, description = "Positions updated atomically", body = ReorderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires modules:manage permission"),
        (status = 404, description = "A module in the batch does not exist"),
        (status = 422, description = "Duplicate ids, negative positions or mixed courses")
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, updates))]
pub async fn update_module_positions(
    State(state): State<AppState>,
    RequireModulesManage(_auth_user): RequireModulesManage,
    Json(updates): Json<Vec<ModulePositionUpdate>>,
) -> Result<Json<ReorderResponse>, AppError> {
    let response = ModuleService::update_positions(&state.db, &updates).await?;
    Ok(Json(response))
}
