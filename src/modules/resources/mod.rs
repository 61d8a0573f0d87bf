pub mod controller;
pub mod router;
pub mod service;
pub mod view;

pub use router::{init_resource_pages_router, init_resources_router};
