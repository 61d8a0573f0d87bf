use std::collections::HashSet;

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use coursekit_core::AppError;
use coursekit_models::{
    CourseId, CourseModule, CourseStatus, CreateModuleDto, ModuleId, ModulePositionUpdate,
    ReorderResponse, UpdateModuleDto, empty_meta, positions::resolve_module_positions,
};

use crate::metrics::track_positions_updated;

pub struct ModuleService;

impl ModuleService {
    /// Modules of a course ordered by position. A hidden or missing course
    /// yields an empty list.
    #[instrument]
    pub async fn list_modules(
        db: &PgPool,
        course_id: CourseId,
        visibility: Option<CourseStatus>,
    ) -> Result<Vec<CourseModule>, AppError> {
        let modules = sqlx::query_as::<_, CourseModule>(
            r#"SELECT m.id, m.title, m.description, m.position, m.course_id, m.meta,
                      m.created_at, m.updated_at
               FROM modules m
               JOIN courses c ON c.id = m.course_id
               WHERE m.course_id = $1
                 AND ($2::course_status IS NULL OR c.status = $2)
               ORDER BY m.position, m.created_at, m.id"#,
        )
        .bind(course_id)
        .bind(visibility)
        .fetch_all(db)
        .await?;

        Ok(modules)
    }

    #[instrument]
    pub async fn create_module(
        db: &PgPool,
        course_id: CourseId,
        dto: CreateModuleDto,
    ) -> Result<CourseModule, AppError> {
        let module = sqlx::query_as::<_, CourseModule>(
            r#"INSERT INTO modules (title, description, position, course_id, meta)
               VALUES ($1, $2,
                       COALESCE($3, (SELECT COALESCE(MAX(position) + 1, 0)
                                     FROM modules WHERE course_id = $4)),
                       $4, $5)
               RETURNING id, title, description, position, course_id, meta,
                         created_at, updated_at"#,
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.position)
        .bind(course_id)
        .bind(dto.meta.unwrap_or_else(empty_meta))
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::not_found(anyhow::anyhow!("Course not found"));
            }
            AppError::from(e)
        })?;

        tracing::info!(module_id = %module.id, course_id = %course_id, "Module created");
        Ok(module)
    }

    #[instrument]
    pub async fn update_module(
        db: &PgPool,
        id: ModuleId,
        dto: UpdateModuleDto,
    ) -> Result<CourseModule, AppError> {
        sqlx::query_as::<_, CourseModule>(
            r#"UPDATE modules
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   meta = COALESCE($4, meta),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, title, description, position, course_id, meta,
                         created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.meta)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Module not found")))
    }

    #[instrument]
    pub async fn delete_module(db: &PgPool, id: ModuleId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Module not found")));
        }

        Ok(())
    }

    /// Applies a reorder batch in one transaction. Every module must exist
    /// and all of them must belong to the same course; otherwise nothing is
    /// written.
    #[instrument(skip(updates), fields(count = updates.len()))]
    pub async fn update_positions(
        db: &PgPool,
        updates: &[ModulePositionUpdate],
    ) -> Result<ReorderResponse, AppError> {
        let resolved = resolve_module_positions(updates).map_err(AppError::unprocessable)?;
        if resolved.is_empty() {
            return Ok(ReorderResponse { updated: 0 });
        }

        let ids: Vec<Uuid> = resolved.iter().map(|r| r.id.into_inner()).collect();
        let positions: Vec<i32> = resolved.iter().map(|r| r.position).collect();

        let mut tx = db.begin().await?;

        let locked: Vec<(ModuleId, CourseId)> = sqlx::query_as(
            "SELECT id, course_id FROM modules WHERE id = ANY($1::uuid[]) ORDER BY id FOR UPDATE",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        if locked.len() != ids.len() {
            let found: HashSet<ModuleId> = locked.iter().map(|(id, _)| *id).collect();
            let missing = resolved
                .iter()
                .find(|r| !found.contains(&r.id))
                .map(|r| r.id.to_string())
                .unwrap_or_default();
            return Err(AppError::not_found(anyhow::anyhow!(
                "Module not found: {}",
                missing
            )));
        }

        let courses: HashSet<CourseId> = locked.iter().map(|(_, course)| *course).collect();
        if courses.len() > 1 {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "All modules in a reorder batch must belong to the same course"
            )));
        }

        let result = sqlx::query(
            r#"UPDATE modules AS m
               SET position = u.position, updated_at = NOW()
               FROM UNNEST($1::uuid[], $2::int4[]) AS u(id, position)
               WHERE m.id = u.id"#,
        )
        .bind(&ids)
        .bind(&positions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let updated = result.rows_affected();
        track_positions_updated("module", resolved.len());
        tracing::info!(updated, "Module positions updated");

        Ok(ReorderResponse { updated })
    }
}
