//! Course domain models and DTOs.
//!
//! The meeting schedule (`dias_json`) is free-form JSON chosen by the web
//! client, typically a list of weekdays. It is persisted as JSON text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;

use control_escolar_core::serde::{
    decode_json_value, deserialize_optional_id, deserialize_string_or_number,
};

/// A `courses` row.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub nrc: String,
    pub name: String,
    pub section: String,
    pub schedule_days: String,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub program: String,
    pub credits: String,
    pub teacher_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: i64,
    pub nrc: String,
    #[serde(rename = "nombre_materia")]
    pub name: String,
    #[serde(rename = "seccion")]
    pub section: String,
    #[serde(rename = "dias_json")]
    #[schema(value_type = Object)]
    pub schedule_days: Value,
    #[serde(rename = "hora_inicio")]
    pub start_time: String,
    #[serde(rename = "hora_fin")]
    pub end_time: String,
    #[serde(rename = "salon")]
    pub room: String,
    #[serde(rename = "programa_educativo")]
    pub program: String,
    #[serde(rename = "creditos")]
    pub credits: String,
    #[serde(rename = "maestro_id")]
    pub teacher_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            nrc: row.nrc,
            name: row.name,
            section: row.section,
            schedule_days: decode_json_value(&row.schedule_days),
            start_time: row.start_time,
            end_time: row.end_time,
            room: row.room,
            program: row.program,
            credits: row.credits,
            teacher_id: row.teacher_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Course fields as sent by the client on create and update.
///
/// Every field is optional on the wire; required-ness of `nrc` and
/// `nombre_materia` is checked after trimming.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CourseInput {
    #[serde(default)]
    pub nrc: String,
    #[serde(rename = "nombre_materia", default)]
    pub name: String,
    #[serde(rename = "seccion", default)]
    pub section: String,
    #[serde(rename = "dias_json", default)]
    #[schema(value_type = Object)]
    pub schedule_days: Option<Value>,
    #[serde(rename = "hora_inicio", default)]
    pub start_time: String,
    #[serde(rename = "hora_fin", default)]
    pub end_time: String,
    #[serde(rename = "salon", default)]
    pub room: String,
    #[serde(rename = "programa_educativo", default)]
    pub program: String,
    #[serde(
        rename = "creditos",
        default,
        deserialize_with = "deserialize_string_or_number"
    )]
    #[schema(value_type = String)]
    pub credits: String,
    /// Teacher reference. Blank, `null` and `0` mean none.
    #[serde(
        rename = "maestro_id",
        default,
        deserialize_with = "deserialize_optional_id"
    )]
    pub teacher_id: Option<i64>,
}

/// Trimmed course fields ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseFields {
    pub nrc: String,
    pub name: String,
    pub section: String,
    pub schedule_days: Value,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub program: String,
    pub credits: String,
    pub teacher_id: Option<i64>,
}

impl CourseInput {
    /// Trims every text field. A missing or `null` schedule becomes `[]`.
    pub fn into_fields(self) -> CourseFields {
        let schedule_days = match self.schedule_days {
            None | Some(Value::Null) => Value::Array(Vec::new()),
            Some(value) => value,
        };

        CourseFields {
            nrc: self.nrc.trim().to_string(),
            name: self.name.trim().to_string(),
            section: self.section.trim().to_string(),
            schedule_days,
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            room: self.room.trim().to_string(),
            program: self.program.trim().to_string(),
            credits: self.credits.trim().to_string(),
            teacher_id: self.teacher_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourseDto {
    pub id: i64,
    #[serde(flatten)]
    pub fields: CourseInput,
}

/// Body of a successful create or update.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseSavedResponse {
    pub message: String,
    pub materia: Course,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_fields_trims_and_defaults_schedule() {
        let input: CourseInput = serde_json::from_value(json!({
            "nrc": "  10234 ",
            "nombre_materia": " Algebra ",
            "creditos": 6,
            "maestro_id": ""
        }))
        .unwrap();

        let fields = input.into_fields();
        assert_eq!(fields.nrc, "10234");
        assert_eq!(fields.name, "Algebra");
        assert_eq!(fields.credits, "6");
        assert_eq!(fields.schedule_days, json!([]));
        assert_eq!(fields.teacher_id, None);
        assert_eq!(fields.section, "");
    }

    #[test]
    fn test_into_fields_keeps_schedule() {
        let input: CourseInput = serde_json::from_value(json!({
            "nrc": "1",
            "nombre_materia": "Algebra",
            "dias_json": ["Mon", "Wed"],
            "maestro_id": 4
        }))
        .unwrap();

        let fields = input.into_fields();
        assert_eq!(fields.schedule_days, json!(["Mon", "Wed"]));
        assert_eq!(fields.teacher_id, Some(4));
    }

    #[test]
    fn test_update_dto_flattens_fields() {
        let dto: UpdateCourseDto = serde_json::from_value(json!({
            "id": 12,
            "nrc": "55",
            "nombre_materia": "Redes",
            "maestro_id": "3"
        }))
        .unwrap();

        assert_eq!(dto.id, 12);
        assert_eq!(dto.fields.nrc, "55");
        assert_eq!(dto.fields.teacher_id, Some(3));
    }

    #[test]
    fn test_course_from_row_malformed_schedule() {
        let now = Utc::now();
        let course = Course::from(CourseRow {
            id: 1,
            nrc: "1".to_string(),
            name: "Redes".to_string(),
            section: "A".to_string(),
            schedule_days: "lunes y martes".to_string(),
            start_time: "07:00".to_string(),
            end_time: "09:00".to_string(),
            room: "CC-101".to_string(),
            program: "ICC".to_string(),
            credits: "6".to_string(),
            teacher_id: None,
            created_at: now,
            updated_at: now,
        });

        assert_eq!(course.schedule_days, json!({}));
        let body = serde_json::to_value(&course).unwrap();
        assert_eq!(body["nombre_materia"], "Redes");
        assert_eq!(body["maestro_id"], json!(null));
    }
}
