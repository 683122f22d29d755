//! Course seeding.

use fake::Fake;
use rayon::prelude::*;
use sqlx::{Postgres, Transaction};

use super::models::{CourseSeed, SEED_NRC_PREFIX};

const COURSE_NAMES: &[&str] = &[
    "Algebra lineal",
    "Calculo diferencial",
    "Calculo integral",
    "Programacion estructurada",
    "Estructuras de datos",
    "Teoria de la computacion",
    "Sistemas operativos",
    "Redes de computadoras",
    "Bases de datos",
    "Ingenieria de software",
];

const PROGRAMS: &[&str] = &["ICC", "LCC", "ITI"];

const SCHEDULES: &[&[&str]] = &[
    &["Lunes", "Miercoles"],
    &["Martes", "Jueves"],
    &["Lunes", "Miercoles", "Viernes"],
    &["Viernes"],
];

/// Generates `count` courses, assigning teachers round-robin. With no
/// teachers every course is left unassigned.
pub fn generate_courses(count: usize, offset: usize, teacher_ids: &[i64]) -> Vec<CourseSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let idx = offset + i;
            let start_hour: u32 = (7..19).fake();
            let teacher_id = if teacher_ids.is_empty() {
                None
            } else {
                Some(teacher_ids[i % teacher_ids.len()])
            };

            CourseSeed {
                nrc: format!("{}{:05}", SEED_NRC_PREFIX, idx),
                name: COURSE_NAMES[idx % COURSE_NAMES.len()].to_string(),
                section: format!("{:03}", idx % 10 + 1),
                schedule_days: SCHEDULES[idx % SCHEDULES.len()]
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
                start_time: format!("{:02}:00", start_hour),
                end_time: format!("{:02}:00", start_hour + 2),
                room: format!("CC-{}", 100 + idx % 40),
                program: PROGRAMS[idx % PROGRAMS.len()].to_string(),
                credits: (4..9).fake::<u32>().to_string(),
                teacher_id,
            }
        })
        .collect()
}

pub async fn insert_courses_batch(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
) -> anyhow::Result<u64> {
    // 10 params per course
    const BATCH_SIZE: usize = 500;

    let mut inserted = 0;
    for chunk in courses.chunks(BATCH_SIZE) {
        inserted += insert_courses_chunk(tx, chunk).await?;
    }

    Ok(inserted)
}

async fn insert_courses_chunk(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
) -> anyhow::Result<u64> {
    if courses.is_empty() {
        return Ok(0);
    }

    let mut query = String::from(
        "INSERT INTO courses (nrc, name, section, schedule_days, start_time, end_time, room, program, credits, teacher_id) VALUES ",
    );

    for i in 0..courses.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 10;
        let placeholders = (1..=10)
            .map(|n| format!("${}", p + n))
            .collect::<Vec<_>>()
            .join(", ");
        query.push('(');
        query.push_str(&placeholders);
        query.push(')');
    }

    let mut q = sqlx::query(&query);
    for course in courses {
        q = q
            .bind(&course.nrc)
            .bind(&course.name)
            .bind(&course.section)
            .bind(serde_json::to_string(&course.schedule_days)?)
            .bind(&course.start_time)
            .bind(&course.end_time)
            .bind(&course.room)
            .bind(&course.program)
            .bind(&course.credits)
            .bind(course.teacher_id);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}
