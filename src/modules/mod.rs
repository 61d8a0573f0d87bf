pub mod course_modules;
pub mod courses;
pub mod pages;
pub mod resources;
pub mod uploads;
