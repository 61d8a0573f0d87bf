//! Course, module and page generation.

use fake::Fake;
use fake::faker::company::en::{Buzzword, CatchPhrase};
use fake::faker::lorem::en::{Paragraphs, Sentence, Words};
use rayon::prelude::*;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use coursekit_models::CourseStatus;

use super::models::{CourseSeed, ModuleSeed, PageSeed, PagesPerCourse, SeedConfig};

fn title_case(words: Vec<String>) -> String {
    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn markdown_body() -> String {
    let heading = title_case(Words(2..5).fake());
    let paragraphs: Vec<String> = Paragraphs(2..4).fake();
    let term: String = Buzzword().fake();

    format!(
        "# {}\n\n{}\n\n```rust\nfn {}() {{}}\n```\n",
        heading,
        paragraphs.join("\n\n"),
        term.to_lowercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"),
    )
}

/// Breadth-first page tree: `per_parent` roots, then `per_parent` children
/// under every page of the previous level, `depth` levels deep.
pub fn generate_pages(shape: &PagesPerCourse) -> Vec<PageSeed> {
    let mut pages = Vec::with_capacity(shape.total());
    let mut parents: Vec<Option<Uuid>> = vec![None];

    for _ in 0..shape.depth {
        let mut next = Vec::with_capacity(parents.len() * shape.per_parent);
        for parent_id in &parents {
            for position in 0..shape.per_parent {
                let id = Uuid::new_v4();
                pages.push(PageSeed {
                    id,
                    title: title_case(Words(2..5).fake()),
                    description: Sentence(5..10).fake(),
                    content: markdown_body(),
                    position: position as i32,
                    parent_id: *parent_id,
                });
                next.push(Some(id));
            }
        }
        parents = next;
    }

    pages
}

/// Generates course data in parallel using Rayon
pub fn generate_courses(config: &SeedConfig) -> Vec<CourseSeed> {
    (0..config.num_courses)
        .into_par_iter()
        .map(|i| {
            let topic: String = CatchPhrase().fake();
            let modules = (0..config.modules_per_course)
                .map(|position| ModuleSeed {
                    title: format!("Week {}: {}", position + 1, title_case(Words(1..3).fake())),
                    description: Sentence(6..12).fake(),
                    position: position as i32,
                })
                .collect();

            CourseSeed {
                id: Uuid::new_v4(),
                name: title_case(topic.split_whitespace().map(str::to_string).collect()),
                description: Sentence(8..16).fake(),
                status: if i % 3 == 0 {
                    CourseStatus::Draft
                } else {
                    CourseStatus::Published
                },
                meta: json!({
                    "thumbnailImage": {
                        "url": format!("https://picsum.photos/seed/{}/640/360", i),
                        "alt": topic,
                    }
                }),
                modules,
                pages: generate_pages(&config.pages),
            }
        })
        .collect()
}

async fn insert_course(
    tx: &mut Transaction<'_, Postgres>,
    course: &CourseSeed,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO courses (id, name, description, status, meta) VALUES ($1, $2, $3, $4, $5)")
        .bind(course.id)
        .bind(&course.name)
        .bind(&course.description)
        .bind(course.status)
        .bind(&course.meta)
        .execute(&mut **tx)
        .await?;

    for module in &course.modules {
        sqlx::query(
            "INSERT INTO modules (title, description, position, course_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(&module.title)
        .bind(&module.description)
        .bind(module.position)
        .bind(course.id)
        .execute(&mut **tx)
        .await?;
    }

    for page in &course.pages {
        sqlx::query(
            r#"INSERT INTO pages (id, title, description, content, position, parent_page_id, course_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(page.id)
        .bind(&page.title)
        .bind(&page.description)
        .bind(&page.content)
        .bind(page.position)
        .bind(page.parent_id)
        .bind(course.id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Seeds courses, one transaction per course so a failure leaves no
/// half-built course behind.
pub async fn seed_courses(db: &PgPool, config: &SeedConfig) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!(
        "📚 Seeding {} courses ({} modules, {} pages each)...",
        config.num_courses,
        config.modules_per_course,
        config.pages.total()
    );

    let courses = generate_courses(config);
    let mut ids = Vec::with_capacity(courses.len());

    for course in &courses {
        let mut tx = db.begin().await?;
        insert_course(&mut tx, course).await?;
        tx.commit().await?;
        ids.push(course.id);
    }

    println!(
        "   ✓ Inserted {} courses in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Clears all courses; modules and pages cascade.
pub async fn clear_courses(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing courses...");

    let deleted = sqlx::query("DELETE FROM courses")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} courses in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}
