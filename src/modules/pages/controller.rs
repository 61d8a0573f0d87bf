use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use coursekit_core::{AppError, PaginationParams};
use coursekit_models::{
    CourseId, CreatePageDto, Page, PageFilterParams, PageId, PagePositionUpdate,
    PaginatedPagesResponse, RenderedPage, ReorderResponse, ReplacePagesDto, ReplacePagesResponse,
    UpdatePageContentDto, UpdatePageDto,
};

use crate::metrics::track_document_rendered;
use crate::middleware::auth::{AuthUser, MaybeAuthUser, RequirePagesManage, visibility_for};
use crate::modules::pages::service::PageService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/courses/{id}/pages",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID"),
        PaginationParams,
        PageFilterParams
    ),
    responses(
        (status = 200, description = "Sibling pages ordered by position", body = PaginatedPagesResponse),
        (status = 401, description = "Invalid token")
    ),
    tag = "Pages",
    security((), ("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course_pages(
    State(state): State<AppState>,
    auth_user: MaybeAuthUser,
    Path(course_id): Path<CourseId>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<PageFilterParams>,
) -> Result<Json<PaginatedPagesResponse>, AppError> {
    let pages = PageService::list_pages(
        &state.db,
        course_id,
        filters.parent(),
        auth_user.visibility(),
        &pagination,
    )
    .await?;

    Ok(Json(pages))
}

#[utoipa::path(
    get,
    path = "/api/pages/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Page ID")
    ),
    responses(
        (status = 200, description = "Page details", body = Page),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Page not found or not visible")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_page(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<PageId>,
) -> Result<Json<Page>, AppError> {
    let page = PageService::get_page(&state.db, id, visibility_for(&auth_user)).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/pages/{id}/rendered",
    params(
        ("id" = uuid::Uuid, Path, description = "Page ID")
    ),
    responses(
        (status = 200, description = "Page content rendered to HTML", body = RenderedPage),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Page not found or not visible")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_rendered_page(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<PageId>,
) -> Result<Json<RenderedPage>, AppError> {
    let page = PageService::get_page(&state.db, id, visibility_for(&auth_user)).await?;

    let content = state.content.clone();
    let markdown = page.content;
    let content_html = tokio::task::spawn_blocking(move || content.renderer().render(&markdown))
        .await
        .map_err(AppError::internal)?;

    track_document_rendered("page");

    Ok(Json(RenderedPage {
        id: page.id,
        title: page.title,
        description: page.description,
        content_html,
    }))
}

#[utoipa::path(
    post,
    path = "/api/pages",
    request_body = CreatePageDto,
    responses(
        (status = 201, description = "Page created", body = Page),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires pages:manage permission"),
        (status = 404, description = "Course or parent page not found"),
        (status = 422, description = "Validation failed or parent in another course")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_page(
    State(state): State<AppState>,
    RequirePagesManage(_auth_user): RequirePagesManage,
    ValidatedJson(dto): ValidatedJson<CreatePageDto>,
) -> Result<(StatusCode, Json<Page>), AppError> {
    let page = PageService::create_page(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

#[utoipa::path(
    put,
    path = "/api/pages/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Page ID")
    ),
    request_body = UpdatePageDto,
    responses(
        (status = 200, description = "Page updated", body = Page),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires pages:manage permission"),
        (status = 404, description = "Page or parent page not found"),
        (status = 422, description = "Validation failed or the move would create a cycle")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_page(
    State(state): State<AppState>,
    RequirePagesManage(_auth_user): RequirePagesManage,
    Path(id): Path<PageId>,
    ValidatedJson(dto): ValidatedJson<UpdatePageDto>,
) -> Result<Json<Page>, AppError> {
    let page = PageService::update_page(&state.db, id, dto).await?;
    Ok(Json(page))
}

#[utoipa::path(
    patch,
    path = "/api/pages/{id}/content",
    params(
        ("id" = uuid::Uuid, Path, description = "Page ID")
    ),
    request_body = UpdatePageContentDto,
    responses(
        (status = 200, description = "Content updated", body = Page),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires pages:manage permission"),
        (status = 404, description = "Page not found")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_page_content(
    State(state): State<AppState>,
    RequirePagesManage(_auth_user): RequirePagesManage,
    Path(id): Path<PageId>,
    ValidatedJson(dto): ValidatedJson<UpdatePageContentDto>,
) -> Result<Json<Page>, AppError> {
    let page = PageService::update_content(&state.db, id, &dto.content).await?;
    Ok(Json(page))
}

#[utoipa::path(
    delete,
    path = "/api/pages/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Page ID")
    ),
    responses(
        (status = 204, description = "Page and its subtree deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires pages:manage permission"),
        (status = 404, description = "Page not found")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_page(
    State(state): State<AppState>,
    RequirePagesManage(_auth_user): RequirePagesManage,
    Path(id): Path<PageId>,
) -> Result<StatusCode, AppError> {
    PageService::delete_page(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/pages/positions",
    request_body = Vec<PagePositionUpdate>,
    responses(
        (status = 200, description = "Positions updated atomically", body = ReorderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires pages:manage permission"),
        (status = 404, description = "A page in the batch does not exist"),
        (status = 422, description = "Duplicate ids, negative positions, mixed courses or a cycle")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, updates))]
pub async fn update_page_positions(
    State(state): State<AppState>,
    RequirePagesManage(_auth_user): RequirePagesManage,
    Json(updates): Json<Vec<PagePositionUpdate>>,
) -> Result<Json<ReorderResponse>, AppError> {
    let response = PageService::update_positions(&state.db, &updates).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}/pages",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    request_body = ReplacePagesDto,
    responses(
        (status = 200, description = "All pages of the course replaced", body = ReplacePagesResponse),
        (status = 400, description = "A page id is already used by another course"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires pages:manage permission"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Validation failed, duplicate ids, unknown parents or a cycle")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn replace_course_pages(
    State(state): State<AppState>,
    RequirePagesManage(_auth_user): RequirePagesManage,
    Path(course_id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<ReplacePagesDto>,
) -> Result<Json<ReplacePagesResponse>, AppError> {
    let response = PageService::replace_pages(&state.db, course_id, dto).await?;
    Ok(Json(response))
}
