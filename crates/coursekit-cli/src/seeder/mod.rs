//! Fake data generation for local development.

pub mod courses;
pub mod models;

pub use courses::{clear_courses, generate_courses, generate_pages, seed_courses};
pub use models::{PagesPerCourse, SeedConfig};

use sqlx::PgPool;
use std::time::Instant;

pub async fn seed_database(db: &PgPool, config: &SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("\n🌱 Starting database seeding...\n");

    let ids = seed_courses(db, config).await?;

    println!(
        "\n✅ Seeded {} courses in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(())
}

pub async fn clear_seeded_data(db: &PgPool) -> anyhow::Result<()> {
    clear_courses(db).await?;
    println!("\n✅ Seeded data cleared");
    Ok(())
}
