//! Seed records and seeding configuration.

use chrono::NaiveDate;

/// Domain of every seeded account's email. `clear-seed` matches on it.
pub const SEED_EMAIL_DOMAIN: &str = "seed.escolar.local";

/// Prefix of every seeded course's NRC. `clear-seed` matches on it.
pub const SEED_NRC_PREFIX: &str = "SEED-";

/// Password shared by all seeded accounts.
pub const SEED_PASSWORD: &str = "password123";

/// Seed data for a teacher and its account.
pub struct TeacherSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub worker_id: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: String,
    pub tax_id: String,
    pub office: String,
    pub research_area: String,
    pub age: Option<i32>,
    pub subjects: Vec<String>,
}

/// Seed data for a course.
pub struct CourseSeed {
    pub nrc: String,
    pub name: String,
    pub section: String,
    pub schedule_days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub program: String,
    pub credits: String,
    pub teacher_id: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub teachers: usize,
    pub courses: usize,
}

impl SeedConfig {
    pub fn new(teachers: usize, courses: usize) -> Self {
        Self { teachers, courses }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 10,
            courses: 30,
        }
    }
}

/// Row counts removed by [`super::clear_all`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClearSummary {
    pub accounts: u64,
    pub courses: u64,
}
