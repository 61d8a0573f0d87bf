use std::collections::HashSet;

use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use coursekit_core::{AppError, PaginationMeta, PaginationParams};
use coursekit_models::{
    CourseId, CourseStatus, CreatePageDto, Page, PageId, PagePositionUpdate, PageTree,
    PaginatedPagesResponse, ReorderResponse, ReplacePagesDto, ReplacePagesResponse,
    UpdatePageDto, empty_meta, positions::resolve_page_positions,
};

use crate::metrics::{track_pages_replaced, track_positions_updated};

pub struct PageService;

/// Serializes structural edits of one course's pages. Every path that
/// locks page rows takes this lock first, so two edits of the same course
/// queue instead of deadlocking.
async fn lock_course(
    tx: &mut Transaction<'_, Postgres>,
    course_id: CourseId,
) -> Result<(), AppError> {
    sqlx::query_scalar::<_, CourseId>("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
        .bind(course_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;
    Ok(())
}

/// Owning course of a page, read without locking.
async fn page_course(
    tx: &mut Transaction<'_, Postgres>,
    id: PageId,
) -> Result<CourseId, AppError> {
    sqlx::query_scalar::<_, CourseId>("SELECT course_id FROM pages WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(page_not_found)
}

/// Every parent edge of a course. Callers hold the course lock.
async fn load_course_tree(
    tx: &mut Transaction<'_, Postgres>,
    course_id: CourseId,
) -> Result<PageTree, AppError> {
    let edges: Vec<(PageId, Option<PageId>)> = sqlx::query_as(
        "SELECT id, parent_page_id FROM pages WHERE course_id = $1",
    )
    .bind(course_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(PageTree::from_edges(edges))
}

fn page_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Page not found"))
}

impl PageService {
    /// One page of siblings under `parent` (`None` for roots), ordered by
    /// position. Pages of hidden courses are left out, so the list is empty
    /// rather than an error.
    #[instrument]
    pub async fn list_pages(
        db: &PgPool,
        course_id: CourseId,
        parent: Option<PageId>,
        visibility: Option<CourseStatus>,
        pagination: &PaginationParams,
    ) -> Result<PaginatedPagesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*)
               FROM pages p
               JOIN courses c ON c.id = p.course_id
               WHERE p.course_id = $1
                 AND p.parent_page_id IS NOT DISTINCT FROM $2
                 AND ($3::course_status IS NULL OR c.status = $3)"#,
        )
        .bind(course_id)
        .bind(parent)
        .bind(visibility)
        .fetch_one(db)
        .await?;

        let pages = sqlx::query_as::<_, Page>(
            r#"SELECT p.id, p.title, p.description, p.content, p.position, p.parent_page_id,
                      p.course_id, p.meta, p.created_at, p.updated_at
               FROM pages p
               JOIN courses c ON c.id = p.course_id
               WHERE p.course_id = $1
                 AND p.parent_page_id IS NOT DISTINCT FROM $2
                 AND ($3::course_status IS NULL OR c.status = $3)
               ORDER BY p.position, p.created_at, p.id
               LIMIT $4 OFFSET $5"#,
        )
        .bind(course_id)
        .bind(parent)
        .bind(visibility)
        .bind(pagination.size())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedPagesResponse {
            data: pages,
            meta: PaginationMeta::new(pagination, total),
        })
    }

    #[instrument]
    pub async fn get_page(
        db: &PgPool,
        id: PageId,
        visibility: Option<CourseStatus>,
    ) -> Result<Page, AppError> {
        sqlx::query_as::<_, Page>(
            r#"SELECT p.id, p.title, p.description, p.content, p.position, p.parent_page_id,
                      p.course_id, p.meta, p.created_at, p.updated_at
               FROM pages p
               JOIN courses c ON c.id = p.course_id
               WHERE p.id = $1
                 AND ($2::course_status IS NULL OR c.status = $2)"#,
        )
        .bind(id)
        .bind(visibility)
        .fetch_optional(db)
        .await?
        .ok_or_else(page_not_found)
    }

    /// The course must exist, and a parent must exist in that same course.
    /// Without a position the page is appended after its last sibling.
    #[instrument]
    pub async fn create_page(db: &PgPool, dto: CreatePageDto) -> Result<Page, AppError> {
        let mut tx = db.begin().await?;

        lock_course(&mut tx, dto.course_id).await?;

        if let Some(parent_id) = dto.parent_page_id {
            let parent_course = sqlx::query_scalar::<_, CourseId>(
                "SELECT course_id FROM pages WHERE id = $1",
            )
            .bind(parent_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Parent page not found")))?;

            if parent_course != dto.course_id {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "Parent page belongs to a different course"
                )));
            }
        }

        let page = sqlx::query_as::<_, Page>(
            r#"INSERT INTO pages (title, description, content, position, parent_page_id, course_id, meta)
               VALUES ($1, $2, $3,
                       COALESCE($4, (SELECT COALESCE(MAX(position) + 1, 0)
                                     FROM pages
                                     WHERE course_id = $6
                                       AND parent_page_id IS NOT DISTINCT FROM $5)),
                       $5, $6, $7)
               RETURNING id, title, description, content, position, parent_page_id,
                         course_id, meta, created_at, updated_at"#,
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.content)
        .bind(dto.position)
        .bind(dto.parent_page_id)
        .bind(dto.course_id)
        .bind(dto.meta.unwrap_or_else(empty_meta))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::not_found(anyhow::anyhow!("Course or parent page not found"));
            }
            AppError::from(e)
        })?;

        tx.commit().await?;

        tracing::info!(page_id = %page.id, course_id = %page.course_id, "Page created");
        Ok(page)
    }

    /// Replaces every editable field. A parent change is checked against the
    /// course tree so the page cannot end up under its own subtree.
    #[instrument]
    pub async fn update_page(db: &PgPool, id: PageId, dto: UpdatePageDto) -> Result<Page, AppError> {
        let mut tx = db.begin().await?;

        let course_id = page_course(&mut tx, id).await?;
        lock_course(&mut tx, course_id).await?;

        let current_parent: Option<PageId> = sqlx::query_scalar(
            "SELECT parent_page_id FROM pages WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(page_not_found)?;

        if dto.parent_page_id != current_parent {
            let mut tree = load_course_tree(&mut tx, course_id).await?;

            if let Some(parent_id) = dto.parent_page_id
                && !tree.contains(parent_id)
            {
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM pages WHERE id = $1)",
                )
                .bind(parent_id)
                .fetch_one(&mut *tx)
                .await?;

                return Err(if exists {
                    AppError::unprocessable(anyhow::anyhow!(
                        "Parent page belongs to a different course"
                    ))
                } else {
                    AppError::not_found(anyhow::anyhow!("Parent page not found"))
                });
            }

            tree.reassign(id, dto.parent_page_id)
                .map_err(AppError::unprocessable)?;
            tree.validate().map_err(AppError::unprocessable)?;
        }

        let page = sqlx::query_as::<_, Page>(
            r#"UPDATE pages
               SET title = $2,
                   description = $3,
                   content = $4,
                   position = $5,
                   parent_page_id = $6,
                   meta = $7,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, title, description, content, position, parent_page_id,
                         course_id, meta, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.content)
        .bind(dto.position)
        .bind(dto.parent_page_id)
        .bind(&dto.meta)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(page)
    }

    #[instrument(skip(content))]
    pub async fn update_content(db: &PgPool, id: PageId, content: &str) -> Result<Page, AppError> {
        sqlx::query_as::<_, Page>(
            r#"UPDATE pages
               SET content = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING id, title, description, content, position, parent_page_id,
                         course_id, meta, created_at, updated_at"#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(db)
        .await?
        .ok_or_else(page_not_found)
    }

    /// Child pages are removed with their parent.
    #[instrument]
    pub async fn delete_page(db: &PgPool, id: PageId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let course_id = page_course(&mut tx, id).await?;
        lock_course(&mut tx, course_id).await?;

        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(page_not_found());
        }

        tx.commit().await?;
        Ok(())
    }

    /// Applies a reorder batch atomically: all listed pages get their new
    /// position (and parent, where given) or none do.
    #[instrument(skip(updates), fields(count = updates.len()))]
    pub async fn update_positions(
        db: &PgPool,
        updates: &[PagePositionUpdate],
    ) -> Result<ReorderResponse, AppError> {
        let resolved = resolve_page_positions(updates).map_err(AppError::unprocessable)?;
        if resolved.is_empty() {
            return Ok(ReorderResponse { updated: 0 });
        }

        let ids: Vec<Uuid> = resolved.iter().map(|r| r.id.into_inner()).collect();
        let positions: Vec<i32> = resolved.iter().map(|r| r.position).collect();
        let parents: Vec<Option<Uuid>> = updates
            .iter()
            .map(|u| u.parent_id.map(PageId::into_inner))
            .collect();

        let mut tx = db.begin().await?;

        let owners: Vec<(PageId, CourseId)> = sqlx::query_as(
            "SELECT id, course_id FROM pages WHERE id = ANY($1::uuid[])",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        if owners.len() != ids.len() {
            let found: HashSet<PageId> = owners.iter().map(|(id, _)| *id).collect();
            let missing = resolved
                .iter()
                .find(|r| !found.contains(&r.id))
                .map(|r| r.id.to_string())
                .unwrap_or_default();
            return Err(AppError::not_found(anyhow::anyhow!(
                "Page not found: {}",
                missing
            )));
        }

        let courses: HashSet<CourseId> = owners.iter().map(|(_, course)| *course).collect();
        let course_id = match courses.iter().next() {
            Some(&course_id) if courses.len() == 1 => course_id,
            _ => {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "All pages in a reorder batch must belong to the same course"
                )));
            }
        };

        lock_course(&mut tx, course_id).await?;

        let locked: Vec<PageId> = sqlx::query_scalar(
            r#"SELECT id FROM pages
               WHERE id = ANY($1::uuid[]) AND course_id = $2
               ORDER BY id
               FOR UPDATE"#,
        )
        .bind(&ids)
        .bind(course_id)
        .fetch_all(&mut *tx)
        .await?;

        // Deleted between the ownership read and the course lock.
        if locked.len() != ids.len() {
            return Err(page_not_found());
        }

        if updates.iter().any(|u| u.parent_id.is_some()) {
            let mut tree = load_course_tree(&mut tx, course_id).await?;
            for update in updates {
                if let Some(parent_id) = update.parent_id {
                    tree.reassign(update.id, Some(parent_id))
                        .map_err(AppError::unprocessable)?;
                }
            }
            tree.validate().map_err(AppError::unprocessable)?;
        }

        let result = sqlx::query(
            r#"UPDATE pages AS p
               SET position = u.position,
                   parent_page_id = COALESCE(u.parent_id, p.parent_page_id),
                   updated_at = NOW()
               FROM UNNEST($1::uuid[], $2::int4[], $3::uuid[]) AS u(id, position, parent_id)
               WHERE p.id = u.id"#,
        )
        .bind(&ids)
        .bind(&positions)
        .bind(&parents)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let updated = result.rows_affected();
        track_positions_updated("page", resolved.len());
        tracing::info!(updated, "Page positions updated");

        Ok(ReorderResponse { updated })
    }

    /// Swaps the whole page set of a course in one transaction. The new set
    /// is checked as a tree before anything is deleted; any failure leaves
    /// the previous pages in place.
    #[instrument(skip(dto), fields(count = dto.pages.len()))]
    pub async fn replace_pages(
        db: &PgPool,
        course_id: CourseId,
        dto: ReplacePagesDto,
    ) -> Result<ReplacePagesResponse, AppError> {
        let mut seen = HashSet::with_capacity(dto.pages.len());
        let mut pages = Vec::with_capacity(dto.pages.len());
        for item in dto.pages {
            let id = item.id.unwrap_or_else(PageId::new);
            if !seen.insert(id) {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "Duplicate page id in replacement: {}",
                    id
                )));
            }
            pages.push((id, item));
        }

        PageTree::from_edges(pages.iter().map(|(id, item)| (*id, item.parent_page_id)))
            .validate()
            .map_err(AppError::unprocessable)?;

        let mut tx = db.begin().await?;

        lock_course(&mut tx, course_id).await?;

        let deleted = sqlx::query("DELETE FROM pages WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for (id, item) in &pages {
            sqlx::query(
                r#"INSERT INTO pages (id, title, description, content, position, parent_page_id, course_id, meta)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
            )
            .bind(id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.content)
            .bind(item.position)
            .bind(item.parent_page_id)
            .bind(course_id)
            .bind(item.meta.clone().unwrap_or_else(empty_meta))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Page id {} is already in use",
                        id
                    ));
                }
                AppError::from(e)
            })?;
        }

        tx.commit().await?;

        let inserted = pages.len() as u64;
        track_pages_replaced(deleted, inserted);
        tracing::info!(%course_id, deleted, inserted, "Course pages replaced");

        Ok(ReplacePagesResponse { deleted, inserted })
    }
}
