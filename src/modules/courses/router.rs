use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_course, delete_course, get_course, get_courses, update_course};
use crate::modules::course_modules::controller::{create_module, get_course_modules};
use crate::modules::pages::controller::{get_course_pages, replace_course_pages};

/// Course routes plus the course-scoped module and page collections.
pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route(
            "/{id}/modules",
            get(get_course_modules).post(create_module),
        )
        .route(
            "/{id}/pages",
            get(get_course_pages).put(replace_course_pages),
        )
}
