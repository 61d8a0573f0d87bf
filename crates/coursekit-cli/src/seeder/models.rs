//! Seed data and configuration.

use coursekit_models::CourseStatus;
use serde_json::Value;
use uuid::Uuid;

pub struct CourseSeed {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: CourseStatus,
    pub meta: Value,
    pub modules: Vec<ModuleSeed>,
    pub pages: Vec<PageSeed>,
}

pub struct ModuleSeed {
    pub title: String,
    pub description: String,
    pub position: i32,
}

/// Pages are listed parents first so they can be inserted in order.
pub struct PageSeed {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub position: i32,
    pub parent_id: Option<Uuid>,
}

/// Shape of the page tree generated per course.
#[derive(Clone, Debug)]
pub struct PagesPerCourse {
    /// Children per page, and root pages per course
    pub per_parent: usize,
    /// Levels of nesting; 1 means root pages only
    pub depth: usize,
}

impl Default for PagesPerCourse {
    fn default() -> Self {
        Self {
            per_parent: 3,
            depth: 2,
        }
    }
}

impl PagesPerCourse {
    /// Pages generated for one course: `n + n² + … + n^depth`.
    pub fn total(&self) -> usize {
        (1..=self.depth as u32)
            .map(|level| self.per_parent.saturating_pow(level))
            .fold(0usize, usize::saturating_add)
    }
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub num_courses: usize,
    pub modules_per_course: usize,
    pub pages: PagesPerCourse,
}

impl SeedConfig {
    pub fn new(num_courses: usize) -> Self {
        Self {
            num_courses,
            modules_per_course: 4,
            pages: PagesPerCourse::default(),
        }
    }

    pub fn with_modules(mut self, modules_per_course: usize) -> Self {
        self.modules_per_course = modules_per_course;
        self
    }

    pub fn with_pages(mut self, pages: PagesPerCourse) -> Self {
        self.pages = pages;
        self
    }
}
