use sqlx::PgPool;
use tracing::instrument;

use coursekit_core::{AppError, PaginationMeta, PaginationParams};
use coursekit_models::{
    Course, CourseId, CourseStatus, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
    empty_meta,
};

pub struct CourseService;

impl CourseService {
    /// `visibility` of `None` lists every course; otherwise only courses in
    /// that status.
    #[instrument]
    pub async fn list_courses(
        db: &PgPool,
        visibility: Option<CourseStatus>,
        pagination: &PaginationParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM courses WHERE ($1::course_status IS NULL OR status = $1)",
        )
        .bind(visibility)
        .fetch_one(db)
        .await?;

        let courses = sqlx::query_as::<_, Course>(
            r#"SELECT id, name, description, status, meta, created_at, updated_at
               FROM courses
               WHERE ($1::course_status IS NULL OR status = $1)
               ORDER BY created_at DESC, id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(visibility)
        .bind(pagination.size())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedCoursesResponse {
            data: courses,
            meta: PaginationMeta::new(pagination, total),
        })
    }

    /// Hidden courses are reported as missing.
    #[instrument]
    pub async fn get_course(
        db: &PgPool,
        id: CourseId,
        visibility: Option<CourseStatus>,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"SELECT id, name, description, status, meta, created_at, updated_at
               FROM courses
               WHERE id = $1 AND ($2::course_status IS NULL OR status = $2)"#,
        )
        .bind(id)
        .bind(visibility)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (name, description, status, meta)
               VALUES ($1, $2, $3, $4)
               RETURNING id, name, description, status, meta, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.status)
        .bind(dto.meta.unwrap_or_else(empty_meta))
        .fetch_one(db)
        .await?;

        tracing::info!(course_id = %course.id, "Course created");
        Ok(course)
    }

    /// Partial update: absent fields keep their stored value.
    #[instrument]
    pub async fn update_course(
        db: &PgPool,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"UPDATE courses
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   status = COALESCE($4, status),
                   meta = COALESCE($5, meta),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, description, status, meta, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.status)
        .bind(&dto.meta)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    /// Modules and pages go with the course.
    #[instrument]
    pub async fn delete_course(db: &PgPool, id: CourseId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Ok(())
    }
}
