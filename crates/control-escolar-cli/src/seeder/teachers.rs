//! Teacher seeding.
//!
//! Each seeded teacher gets an account in the `maestro` role group. Accounts
//! and profiles are inserted in multi-row batches inside the caller's
//! transaction.

use chrono::{Datelike, NaiveDate, Utc};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{Postgres, Transaction};

use super::models::{SEED_EMAIL_DOMAIN, TeacherSeed};

const RESEARCH_AREAS: &[&str] = &[
    "Compiladores",
    "Bases de datos",
    "Redes",
    "Inteligencia artificial",
    "Sistemas distribuidos",
    "Graficación",
    "Ingeniería de software",
];

const SUBJECTS: &[&str] = &[
    "Algebra",
    "Calculo",
    "Programacion",
    "Estructuras de datos",
    "Automatas",
    "Sistemas operativos",
    "Probabilidad",
    "Redes",
];

/// Generates `count` teachers in parallel. `offset` keeps worker ids and
/// emails unique across repeated runs.
pub fn generate_teachers(count: usize, offset: usize, password_hash: &str) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_teacher(offset + idx, password_hash))
        .collect()
}

fn generate_teacher(idx: usize, password_hash: &str) -> TeacherSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let age: i32 = (28..70).fake();
    let month: u32 = (1..13).fake();
    let day: u32 = (1..29).fake();
    let birth_date = NaiveDate::from_ymd_opt(Utc::now().year() - age, month, day);

    let subject_count: usize = (1..4).fake();
    let subjects = (0..subject_count)
        .map(|i| SUBJECTS[(idx + i * 3) % SUBJECTS.len()].to_string())
        .collect();

    let phone: u64 = (2_000_000_000u64..3_000_000_000u64).fake();

    TeacherSeed {
        email: format!(
            "{}.{}+{}@{}",
            email_part(&first_name),
            email_part(&last_name),
            idx,
            SEED_EMAIL_DOMAIN
        ),
        tax_id: tax_id(&first_name, &last_name, birth_date, idx),
        first_name,
        last_name,
        password_hash: password_hash.to_string(),
        worker_id: format!("T-{:05}", idx),
        birth_date,
        phone: phone.to_string(),
        office: format!("{}-{}", ['A', 'B', 'C'][idx % 3], 100 + idx % 50),
        research_area: RESEARCH_AREAS[idx % RESEARCH_AREAS.len()].to_string(),
        age: Some(age),
        subjects,
    }
}

fn email_part(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Builds an RFC-shaped tax id: name initials, birth date, and a homoclave
/// derived from the index.
fn tax_id(first_name: &str, last_name: &str, birth_date: Option<NaiveDate>, idx: usize) -> String {
    let initials: String = last_name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(2)
        .chain(first_name.chars().filter(|c| c.is_ascii_alphabetic()).take(2))
        .collect();
    let date = birth_date
        .map(|d| d.format("%y%m%d").to_string())
        .unwrap_or_else(|| "000000".to_string());

    format!("{}{}{:03}", initials, date, idx % 1000).to_uppercase()
}

/// Inserts accounts, their memberships in `role_id`, and the teacher
/// profiles. Returns the teacher ids in input order.
pub async fn insert_teachers_batch(
    tx: &mut Transaction<'_, Postgres>,
    teachers: &[TeacherSeed],
    role_id: i64,
) -> anyhow::Result<Vec<i64>> {
    // 4 params per account, 9 per profile
    const BATCH_SIZE: usize = 500;

    let mut teacher_ids = Vec::with_capacity(teachers.len());

    for chunk in teachers.chunks(BATCH_SIZE) {
        let user_ids = insert_accounts_chunk(tx, chunk).await?;
        assign_role_chunk(tx, &user_ids, role_id).await?;
        teacher_ids.extend(insert_profiles_chunk(tx, chunk, &user_ids).await?);
    }

    Ok(teacher_ids)
}

async fn insert_accounts_chunk(
    tx: &mut Transaction<'_, Postgres>,
    teachers: &[TeacherSeed],
) -> anyhow::Result<Vec<i64>> {
    if teachers.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (username, email, first_name, last_name, password, is_active) VALUES ",
    );

    for i in 0..teachers.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, TRUE)",
            p + 1,
            p + 1,
            p + 2,
            p + 3,
            p + 4
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, i64>(&query);
    for teacher in teachers {
        q = q
            .bind(&teacher.email)
            .bind(&teacher.first_name)
            .bind(&teacher.last_name)
            .bind(&teacher.password_hash);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn assign_role_chunk(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[i64],
    role_id: i64,
) -> anyhow::Result<()> {
    if user_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO user_roles (user_id, role_id)
         SELECT unnest($1::BIGINT[]), $2
         ON CONFLICT (user_id, role_id) DO NOTHING",
    )
    .bind(user_ids)
    .bind(role_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_profiles_chunk(
    tx: &mut Transaction<'_, Postgres>,
    teachers: &[TeacherSeed],
    user_ids: &[i64],
) -> anyhow::Result<Vec<i64>> {
    if teachers.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO teachers (user_id, worker_id, birth_date, phone, tax_id, office, research_area, age, subjects) VALUES ",
    );

    for i in 0..teachers.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 9;
        let placeholders = (1..=9)
            .map(|n| format!("${}", p + n))
            .collect::<Vec<_>>()
            .join(", ");
        query.push('(');
        query.push_str(&placeholders);
        query.push(')');
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, i64>(&query);
    for (teacher, user_id) in teachers.iter().zip(user_ids) {
        q = q
            .bind(*user_id)
            .bind(&teacher.worker_id)
            .bind(teacher.birth_date)
            .bind(&teacher.phone)
            .bind(&teacher.tax_id)
            .bind(&teacher.office)
            .bind(&teacher.research_area)
            .bind(teacher.age)
            .bind(serde_json::to_string(&teacher.subjects)?);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_teachers_count_and_domain() {
        let teachers = generate_teachers(12, 0, "hash");
        assert_eq!(teachers.len(), 12);
        for teacher in &teachers {
            assert!(teacher.email.ends_with("@seed.escolar.local"));
            assert_eq!(teacher.password_hash, "hash");
            assert!(!teacher.subjects.is_empty());
        }
    }

    #[test]
    fn test_generate_teachers_unique_emails() {
        let teachers = generate_teachers(50, 100, "hash");
        let mut emails: Vec<_> = teachers.iter().map(|t| t.email.clone()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), 50);
    }

    #[test]
    fn test_tax_id_is_uppercase() {
        let tax_id = tax_id("ana", "gómez", NaiveDate::from_ymd_opt(1980, 5, 17), 7);
        assert_eq!(tax_id, "GMAN800517007");
    }

    #[test]
    fn test_email_part_strips_punctuation() {
        assert_eq!(email_part("O'Kon"), "okon");
    }
}
