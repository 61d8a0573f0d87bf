use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use coursekit_auth::UserRole;
use coursekit_content::RenderedDocument;
use coursekit_core::{PaginationMeta, PaginationParams};
use coursekit_models::{
    Course, CourseModule, CourseStatus, CreateCourseDto, CreateModuleDto, CreatePageDto,
    ModulePositionUpdate, Page, PagePositionUpdate, PaginatedCoursesResponse,
    PaginatedPagesResponse, RenderedPage, ReorderResponse, ReplacePageItem, ReplacePagesDto,
    ReplacePagesResponse, UpdateCourseDto, UpdateModuleDto, UpdatePageContentDto, UpdatePageDto,
};

use crate::modules::uploads::{UploadForm, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::course_modules::controller::get_course_modules,
        crate::modules::course_modules::controller::create_module,
        crate::modules::course_modules::controller::update_module,
        crate::modules::course_modules::controller::delete_module,
        crate::modules::course_modules::controller::update_module_positions,
        crate::modules::pages::controller::get_course_pages,
        crate::modules::pages::controller::get_page,
        crate::modules::pages::controller::get_rendered_page,
        crate::modules::pages::controller::create_page,
        crate::modules::pages::controller::update_page,
        crate::modules::pages::controller::update_page_content,
        crate::modules::pages::controller::delete_page,
        crate::modules::pages::controller::update_page_positions,
        crate::modules::pages::controller::replace_course_pages,
        crate::modules::resources::controller::get_resource,
        crate::modules::uploads::controller::upload_file,
    ),
    components(
        schemas(
            UserRole,
            Course,
            CourseStatus,
            CreateCourseDto,
            UpdateCourseDto,
            PaginatedCoursesResponse,
            CourseModule,
            CreateModuleDto,
            UpdateModuleDto,
            ModulePositionUpdate,
            Page,
            CreatePageDto,
            UpdatePageDto,
            UpdatePageContentDto,
            PagePositionUpdate,
            PaginatedPagesResponse,
            ReorderResponse,
            ReplacePageItem,
            ReplacePagesDto,
            ReplacePagesResponse,
            RenderedPage,
            RenderedDocument,
            UploadForm,
            UploadResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Courses", description = "Course catalog"),
        (name = "Modules", description = "Ordered modules of a course"),
        (name = "Pages", description = "Nested content pages, reordering and bulk replacement"),
        (name = "Resources", description = "Static markdown documents"),
        (name = "Uploads", description = "File uploads for course assets")
    ),
    info(
        title = "Coursekit API",
        version = "0.1.0",
        description = "Course catalog API built with Rust, Axum, and PostgreSQL: courses, modules, nested pages and markdown rendering.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_page_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/pages/positions"));
        assert!(paths.contains_key("/api/courses/{id}/pages"));
        assert!(paths.contains_key("/api/pages/{id}/rendered"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
