//! Database seeding for development and manual testing.
//!
//! Generation runs in parallel with rayon; everything a single run inserts
//! is written in one transaction. Seeded rows are recognizable by the
//! account email domain and the course NRC prefix, which is what
//! [`clear_all`] deletes by.

pub mod courses;
pub mod models;
pub mod teachers;

use std::time::Instant;

use anyhow::Context;
use sqlx::PgPool;

use control_escolar_core::hash_password;
use control_escolar_db::ensure_role_group;
use control_escolar_models::role_groups;

pub use models::{
    ClearSummary, CourseSeed, SEED_EMAIL_DOMAIN, SEED_NRC_PREFIX, SEED_PASSWORD, SeedConfig,
    TeacherSeed,
};

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub teacher_ids: Vec<i64>,
    pub courses: u64,
}

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<SeedSummary> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} teachers and {} courses...",
        config.teachers, config.courses
    );

    // Shared by every seeded account.
    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e.error))?;

    let teacher_offset = count_seeded_accounts(db).await?;
    let course_offset = count_seeded_courses(db).await?;

    let teacher_seeds =
        teachers::generate_teachers(config.teachers, teacher_offset, &password_hash);

    let mut tx = db.begin().await?;

    let role_id = ensure_role_group(&mut *tx, role_groups::TEACHER)
        .await
        .context("Failed to ensure the teacher role group")?;
    let teacher_ids = teachers::insert_teachers_batch(&mut tx, &teacher_seeds, role_id).await?;
    println!("   ✓ Inserted {} teachers", teacher_ids.len());

    let course_seeds = courses::generate_courses(config.courses, course_offset, &teacher_ids);
    let inserted_courses = courses::insert_courses_batch(&mut tx, &course_seeds).await?;
    println!("   ✓ Inserted {} courses", inserted_courses);

    tx.commit().await?;

    println!("   ✓ Completed in {:?}", start_time.elapsed());
    println!("   Seeded accounts log in with password '{}'", SEED_PASSWORD);

    Ok(SeedSummary {
        teacher_ids,
        courses: inserted_courses,
    })
}

/// Deletes seeded courses and seeded accounts. Teacher rows go with their
/// accounts.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<ClearSummary> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;

    let courses = sqlx::query("DELETE FROM courses WHERE nrc LIKE $1")
        .bind(format!("{}%", SEED_NRC_PREFIX))
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let accounts = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} courses and {} accounts in {:?}",
        courses,
        accounts,
        start_time.elapsed()
    );

    Ok(ClearSummary { accounts, courses })
}

async fn count_seeded_accounts(db: &PgPool) -> anyhow::Result<usize> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .fetch_one(db)
        .await?;
    Ok(count as usize)
}

async fn count_seeded_courses(db: &PgPool) -> anyhow::Result<usize> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE nrc LIKE $1")
        .bind(format!("{}%", SEED_NRC_PREFIX))
        .fetch_one(db)
        .await?;
    Ok(count as usize)
}
