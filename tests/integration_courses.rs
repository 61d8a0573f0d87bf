mod common;

use axum::http::StatusCode;
use common::{TestApp, admin_token, create_test_course, create_test_module, create_test_page, user_token};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn test_list_courses_respects_status(pool: PgPool) {
    create_test_course(&pool, "Published", true).await;
    create_test_course(&pool, "Draft", false).await;

    let app = TestApp::new(pool);

    let (status, body) = app.send("GET", "/api/courses", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Published");
    assert_eq!(body["data"][0]["status"], "PUBLISHED");

    let (_, body) = app
        .send("GET", "/api/courses", Some(&user_token()), None)
        .await;
    assert_eq!(body["meta"]["total"], 1);

    let (_, body) = app
        .send("GET", "/api/courses?size=1", Some(&admin_token()), None)
        .await;
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["meta"]["has_more"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_course(pool: PgPool) {
    let published = create_test_course(&pool, "Published", true).await;
    let draft = create_test_course(&pool, "Draft", false).await;

    let app = TestApp::new(pool);

    let (status, body) = app
        .send("GET", &format!("/api/courses/{}", published), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(published));

    let (status, _) = app
        .send("GET", &format!("/api/courses/{}", draft), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            "GET",
            &format!("/api/courses/{}", draft),
            Some(&admin_token()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("GET", "/api/courses/not-a-uuid", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_lifecycle(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let token = admin_token();

    let (status, course) = app
        .send(
            "POST",
            "/api/courses",
            Some(&token),
            Some(json!({
                "name": "Remote sensing",
                "description": "Satellites and sensors",
                "meta": { "thumbnailImage": { "url": "https://example.com/rs.png", "alt": "Orbit" } }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["status"], "DRAFT");
    let id = course["id"].as_str().unwrap().to_string();

    let (status, updated) = app
        .send(
            "PUT",
            &format!("/api/courses/{}", id),
            Some(&token),
            Some(json!({ "status": "PUBLISHED" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "PUBLISHED");
    assert_eq!(updated["name"], "Remote sensing");
    assert_eq!(updated["meta"]["thumbnailImage"]["alt"], "Orbit");

    let course_id: Uuid = id.parse().unwrap();
    create_test_module(&pool, course_id, "Week 1", 0).await;
    create_test_page(&pool, course_id, "Intro", 0, None).await;

    let (status, _) = app
        .send("DELETE", &format!("/api/courses/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let orphans: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM pages WHERE course_id = $1) + (SELECT COUNT(*) FROM modules WHERE course_id = $1)",
    )
    .bind(course_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(orphans, 0);

    let (status, _) = app
        .send("DELETE", &format!("/api/courses/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_validation_and_permissions(pool: PgPool) {
    let app = TestApp::new(pool);

    let (status, _) = app
        .send(
            "POST",
            "/api/courses",
            Some(&user_token()),
            Some(json!({ "name": "Nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            "POST",
            "/api/courses",
            Some(&admin_token()),
            Some(json!({ "name": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .send(
            "POST",
            "/api/courses",
            Some(&admin_token()),
            Some(json!({ "name": "Meta", "meta": "not an object" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .send(
            "POST",
            "/api/courses",
            Some(&admin_token()),
            Some(json!({ "name": "Status", "status": "ARCHIVED" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
