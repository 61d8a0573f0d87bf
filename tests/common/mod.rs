use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use coursekit::coursekit_auth::{UserRole, create_access_token};
use coursekit::coursekit_config::JwtConfig;
use coursekit::router::init_router;
use coursekit::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const FAQ_MARKDOWN: &str = "---\ntitle: FAQ\ndescription: Common questions\nupdated: 2024-05-01\n---\n# Questions\n\nSee [the docs](https://example.com/docs) or ask @octocat.\n";

/// Router plus the temporary directories backing documents and uploads.
#[allow(dead_code)]
pub struct TestApp {
    pub pool: PgPool,
    pub docs: TempDir,
    pub uploads: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        let docs = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(docs.path().join("res")).unwrap();
        std::fs::write(docs.path().join("res/faq.md"), FAQ_MARKDOWN).unwrap();

        Self {
            pool,
            docs,
            uploads: tempfile::tempdir().unwrap(),
        }
    }

    /// For tests that never reach the database.
    pub fn without_db() -> Self {
        let pool = PgPool::connect_lazy("postgres://coursekit@localhost/unused").unwrap();
        Self::new(pool)
    }

    pub fn router(&self) -> Router {
        init_router(AppState::for_tests(
            self.pool.clone(),
            self.docs.path().to_path_buf(),
            self.uploads.path().to_path_buf(),
        ))
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}

#[allow(dead_code)]
pub fn token(role: UserRole) -> String {
    let jwt_config = JwtConfig {
        secret: AppState::TEST_JWT_SECRET.to_string(),
        access_token_expiry: 3600,
    };
    create_access_token(Uuid::new_v4(), "tester@example.com", role, &jwt_config).unwrap()
}

#[allow(dead_code)]
pub fn admin_token() -> String {
    token(UserRole::Admin)
}

#[allow(dead_code)]
pub fn user_token() -> String {
    token(UserRole::User)
}

#[allow(dead_code)]
pub async fn create_test_course(pool: &PgPool, name: &str, published: bool) -> Uuid {
    let status = if published { "PUBLISHED" } else { "DRAFT" };
    sqlx::query_scalar(
        "INSERT INTO courses (name, status) VALUES ($1, $2::course_status) RETURNING id",
    )
    .bind(name)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_page(
    pool: &PgPool,
    course_id: Uuid,
    title: &str,
    position: i32,
    parent_id: Option<Uuid>,
) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO pages (title, content, position, parent_page_id, course_id)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id"#,
    )
    .bind(title)
    .bind(format!("# {}\n\nBody of {}.", title, title))
    .bind(position)
    .bind(parent_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_module(pool: &PgPool, course_id: Uuid, title: &str, position: i32) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO modules (title, position, course_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(title)
    .bind(position)
    .bind(course_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// `(title, position)` of a course's pages under `parent`, in list order.
#[allow(dead_code)]
pub async fn page_positions(
    pool: &PgPool,
    course_id: Uuid,
    parent_id: Option<Uuid>,
) -> Vec<(String, i32)> {
    sqlx::query_as(
        r#"SELECT title, position FROM pages
           WHERE course_id = $1 AND parent_page_id IS NOT DISTINCT FROM $2
           ORDER BY position, created_at, id"#,
    )
    .bind(course_id)
    .bind(parent_id)
    .fetch_all(pool)
    .await
    .unwrap()
}
