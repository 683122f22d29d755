use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use control_escolar_core::AppError;
use control_escolar_core::serde::encode_json_text;

use crate::modules::courses::model::{
    Course, CourseFields, CourseInput, CourseRow, UpdateCourseDto,
};

const COURSE_COLUMNS: &str = "id, nrc, name, section, schedule_days, start_time, end_time, \
                              room, program, credits, teacher_id, created_at, updated_at";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn get_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        let query = format!("SELECT {} FROM courses ORDER BY id ASC", COURSE_COLUMNS);

        let courses = sqlx::query_as::<_, CourseRow>(&query)
            .fetch_all(db)
            .await
            .context("Failed to fetch courses")
            .map_err(AppError::database)?;

        Ok(courses.into_iter().map(Course::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, id: i64) -> Result<Course, AppError> {
        let query = format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS);

        let course = sqlx::query_as::<_, CourseRow>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch course by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| course_not_found(id))?;

        Ok(Course::from(course))
    }

    /// Resolves the teacher reference, checks the required fields and inserts.
    #[instrument(skip(db, input), fields(nrc = %input.nrc))]
    pub async fn create_course(db: &PgPool, input: CourseInput) -> Result<Course, AppError> {
        let fields = input.into_fields();

        let mut conn = db.acquire().await.map_err(unexpected)?;
        ensure_teacher_exists(&mut conn, fields.teacher_id).await?;
        check_required(&fields)?;

        let schedule_days = encode_json_text(&fields.schedule_days)?;

        let query = format!(
            r#"INSERT INTO courses
                   (nrc, name, section, schedule_days, start_time, end_time, room, program,
                    credits, teacher_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING {}"#,
            COURSE_COLUMNS
        );

        let course = sqlx::query_as::<_, CourseRow>(&query)
            .bind(&fields.nrc)
            .bind(&fields.name)
            .bind(&fields.section)
            .bind(&schedule_days)
            .bind(&fields.start_time)
            .bind(&fields.end_time)
            .bind(&fields.room)
            .bind(&fields.program)
            .bind(&fields.credits)
            .bind(fields.teacher_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(classify_write_error)?;

        tracing::info!(course_id = course.id, "Course registered");

        Ok(Course::from(course))
    }

    /// Overwrites every field of the course, including the teacher reference.
    #[instrument(skip(db, dto), fields(course_id = dto.id))]
    pub async fn update_course(db: &PgPool, dto: UpdateCourseDto) -> Result<Course, AppError> {
        let id = dto.id;
        let fields = dto.fields.into_fields();

        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to fetch course by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| course_not_found(id))?;

        ensure_teacher_exists(&mut tx, fields.teacher_id).await?;
        check_required(&fields)?;

        let schedule_days = encode_json_text(&fields.schedule_days)?;

        let query = format!(
            r#"UPDATE courses
               SET nrc = $1, name = $2, section = $3, schedule_days = $4, start_time = $5,
                   end_time = $6, room = $7, program = $8, credits = $9, teacher_id = $10,
                   updated_at = NOW()
               WHERE id = $11
               RETURNING {}"#,
            COURSE_COLUMNS
        );

        let course = sqlx::query_as::<_, CourseRow>(&query)
            .bind(&fields.nrc)
            .bind(&fields.name)
            .bind(&fields.section)
            .bind(&schedule_days)
            .bind(&fields.start_time)
            .bind(&fields.end_time)
            .bind(&fields.room)
            .bind(&fields.program)
            .bind(&fields.credits)
            .bind(fields.teacher_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify_write_error)?;

        tx.commit().await?;

        Ok(Course::from(course))
    }

    /// Unknown ids are a 404; any other failure is a generic 400.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: i64) -> Result<(), AppError> {
        let course = Self::get_course_by_id(db, id).await?;

        delete_row(db, course.id).await.map_err(|e| {
            tracing::warn!(course_id = id, error = ?e, "Failed to delete course");
            AppError::bad_request(anyhow::anyhow!("Something went wrong while deleting"))
        })
    }
}

async fn ensure_teacher_exists(
    conn: &mut PgConnection,
    teacher_id: Option<i64>,
) -> Result<(), AppError> {
    let Some(teacher_id) = teacher_id else {
        return Ok(());
    };

    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
            .bind(teacher_id)
            .fetch_one(conn)
            .await
            .map_err(unexpected)?;

    if !exists {
        return Err(
            AppError::bad_request(anyhow::anyhow!("Teacher not found"))
                .with_message(format!("Teacher with ID {} does not exist", teacher_id)),
        );
    }

    Ok(())
}

fn check_required(fields: &CourseFields) -> Result<(), AppError> {
    if fields.nrc.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!("Empty field"))
            .with_message("NRC is required"));
    }
    if fields.name.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!("Empty field"))
            .with_message("Course name is required"));
    }
    Ok(())
}

/// Integrity violations are the client's problem (400); anything else is ours.
fn classify_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && (db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
            || db_err.is_check_violation())
    {
        let detail = db_err.message().to_string();
        return AppError::bad_request(anyhow::anyhow!(detail))
            .with_message("Database integrity error");
    }

    unexpected(e)
}

fn unexpected(e: sqlx::Error) -> AppError {
    tracing::error!(error = ?e, "Unexpected database failure while saving course");
    AppError::internal(e).with_message("Error registering course. Check the server log.")
}

async fn delete_row(db: &PgPool, id: i64) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;

    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("course {} was already gone", id);
    }

    tx.commit().await?;
    Ok(())
}

fn course_not_found(id: i64) -> AppError {
    AppError::not_found(anyhow::anyhow!("Course with id {} not found", id))
}
