use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use control_escolar_core::serde::encode_json_text;
use control_escolar_core::{AppError, hash_password};
use control_escolar_db::{add_user_to_role_group, ensure_role_group};

use crate::modules::teachers::model::{CreateTeacherDto, Teacher, TeacherRow, UpdateTeacherDto};

const TEACHER_COLUMNS: &str = r#"SELECT
        t.id,
        t.user_id,
        t.worker_id,
        t.birth_date,
        t.phone,
        t.tax_id,
        t.office,
        t.research_area,
        t.age,
        t.subjects,
        t.created_at,
        t.updated_at,
        u.first_name,
        u.last_name,
        u.email,
        u.is_active
       FROM teachers t
       JOIN users u ON u.id = t.user_id"#;

pub struct TeacherService;

impl TeacherService {
    /// Teachers whose account is active, by ascending id.
    #[instrument(skip(db))]
    pub async fn get_active_teachers(db: &PgPool) -> Result<Vec<Teacher>, AppError> {
        let query = format!("{} WHERE u.is_active ORDER BY t.id ASC", TEACHER_COLUMNS);

        let teachers = sqlx::query_as::<_, TeacherRow>(&query)
            .fetch_all(db)
            .await
            .context("Failed to fetch teachers")
            .map_err(AppError::database)?;

        Ok(teachers.into_iter().map(Teacher::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn get_teacher_by_id(db: &PgPool, id: i64) -> Result<Teacher, AppError> {
        let query = format!("{} WHERE t.id = $1", TEACHER_COLUMNS);

        let teacher = sqlx::query_as::<_, TeacherRow>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch teacher by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| {
                AppError::not_found(anyhow::anyhow!("Teacher with id {} not found", id))
            })?;

        Ok(Teacher::from(teacher))
    }

    /// Registers the account, its role-group membership and the teacher
    /// profile in one transaction. Returns the new teacher id.
    #[instrument(skip(db, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<i64, AppError> {
        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM users WHERE email = $1 OR username = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await
        .context("Failed to check for an existing account")
        .map_err(AppError::database)?;

        if taken.is_some() {
            return Err(username_taken(&dto.email));
        }

        let hashed_password = hash_password(&dto.password)?;
        let subjects = encode_json_text(&dto.subjects)?;

        let mut tx = db.begin().await?;

        let user_id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO users (username, email, first_name, last_name, password, is_active)
               VALUES ($1, $1, $2, $3, $4, TRUE)
               RETURNING id"#,
        )
        .bind(&dto.email)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&hashed_password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return username_taken(&dto.email);
            }
            AppError::database(anyhow::Error::from(e).context("Failed to insert account"))
        })?;

        let role_id = ensure_role_group(&mut *tx, &dto.role)
            .await
            .context("Failed to ensure role group")
            .map_err(AppError::database)?;
        add_user_to_role_group(&mut *tx, user_id, role_id)
            .await
            .context("Failed to assign role group")
            .map_err(AppError::database)?;

        let teacher_id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO teachers
                   (user_id, worker_id, birth_date, phone, tax_id, office, research_area, age, subjects)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING id"#,
        )
        .bind(user_id)
        .bind(&dto.worker_id)
        .bind(dto.birth_date)
        .bind(&dto.phone)
        .bind(dto.tax_id.to_uppercase())
        .bind(&dto.office)
        .bind(&dto.research_area)
        .bind(dto.age)
        .bind(&subjects)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert teacher")
        .map_err(AppError::database)?;

        tx.commit().await?;

        tracing::info!(teacher_id, user_id, "Teacher registered");

        Ok(teacher_id)
    }

    /// Overwrites the teacher profile and the account's names together.
    #[instrument(skip(db, dto), fields(teacher_id = dto.id))]
    pub async fn update_teacher(db: &PgPool, dto: UpdateTeacherDto) -> Result<Teacher, AppError> {
        let subjects = encode_json_text(&dto.subjects)?;

        let mut tx = db.begin().await?;

        let user_id =
            sqlx::query_scalar::<_, i64>("SELECT user_id FROM teachers WHERE id = $1 FOR UPDATE")
                .bind(dto.id)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to fetch teacher by ID")
                .map_err(AppError::database)?
                .ok_or_else(|| {
                    AppError::not_found(anyhow::anyhow!("Teacher with id {} not found", dto.id))
                })?;

        sqlx::query(
            r#"UPDATE teachers
               SET worker_id = $1, tax_id = $2, phone = $3, age = $4, subjects = $5,
                   updated_at = NOW()
               WHERE id = $6"#,
        )
        .bind(&dto.worker_id)
        .bind(dto.tax_id.to_uppercase())
        .bind(&dto.phone)
        .bind(dto.age)
        .bind(&subjects)
        .bind(dto.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update teacher")
        .map_err(AppError::database)?;

        sqlx::query(
            r#"UPDATE users
               SET first_name = $1, last_name = $2, updated_at = NOW()
               WHERE id = $3"#,
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("Failed to update teacher account")
        .map_err(AppError::database)?;

        tx.commit().await?;

        Self::get_teacher_by_id(db, dto.id).await
    }

    /// Deletes the teacher's account; the teacher row goes with it.
    ///
    /// Unknown ids are a 404. Every other failure is reported as a generic
    /// 400 without distinguishing the cause.
    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: i64) -> Result<(), AppError> {
        let teacher = Self::get_teacher_by_id(db, id).await?;

        delete_account(db, teacher.user.id).await.map_err(|e| {
            tracing::warn!(teacher_id = id, error = ?e, "Failed to delete teacher");
            AppError::bad_request(anyhow::anyhow!("Something went wrong while deleting"))
        })
    }
}

async fn delete_account(db: &PgPool, user_id: i64) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("account {} was already gone", user_id);
    }

    tx.commit().await?;
    Ok(())
}

fn username_taken(email: &str) -> AppError {
    AppError::bad_request(anyhow::anyhow!("Username {} is already taken", email))
}
