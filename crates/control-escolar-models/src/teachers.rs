//! Teacher domain models and DTOs.
//!
//! A teacher row always belongs to exactly one account (`users`). The list of
//! subjects the teacher covers is persisted as JSON text and exposed as a
//! JSON array under `materias_json`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use control_escolar_core::serde::decode_json_list;

use crate::users::{UserSummary, role_groups};

/// A `teachers` row joined with its account.
#[derive(Debug, Clone, FromRow)]
pub struct TeacherRow {
    pub id: i64,
    pub user_id: i64,
    pub worker_id: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: String,
    pub tax_id: String,
    pub office: String,
    pub research_area: String,
    pub age: Option<i32>,
    pub subjects: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
}

/// Teacher record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Teacher {
    pub id: i64,
    pub user: UserSummary,
    #[serde(rename = "id_trabajador")]
    pub worker_id: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "rfc")]
    pub tax_id: String,
    #[serde(rename = "cubiculo")]
    pub office: String,
    #[serde(rename = "area_investigacion")]
    pub research_area: String,
    #[serde(rename = "edad")]
    pub age: Option<i32>,
    #[serde(rename = "materias_json")]
    #[schema(value_type = Vec<Object>)]
    pub subjects: Vec<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeacherRow> for Teacher {
    fn from(row: TeacherRow) -> Self {
        Self {
            id: row.id,
            user: UserSummary {
                id: row.user_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                is_active: row.is_active,
            },
            worker_id: row.worker_id,
            birth_date: row.birth_date,
            phone: row.phone,
            tax_id: row.tax_id,
            office: row.office,
            research_area: row.research_area,
            age: row.age,
            subjects: decode_json_list(&row.subjects),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn default_role() -> String {
    role_groups::TEACHER.to_string()
}

/// Registration payload: the account fields plus the teacher profile.
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    /// Role-group the new account joins. Created on first use.
    #[serde(rename = "rol", default = "default_role")]
    #[validate(length(min = 1, max = 150, message = "rol must not be empty"))]
    pub role: String,
    #[validate(length(min = 1, max = 150, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150, message = "last_name is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(rename = "id_trabajador")]
    #[validate(length(min = 1, message = "id_trabajador is required"))]
    pub worker_id: String,
    #[serde(rename = "fecha_nacimiento", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "rfc")]
    #[validate(length(min = 1, message = "rfc is required"))]
    pub tax_id: String,
    #[serde(rename = "cubiculo", default)]
    pub office: String,
    #[serde(rename = "area_investigacion", default)]
    pub research_area: String,
    #[serde(rename = "edad", default)]
    #[validate(range(min = 0, max = 150, message = "edad is out of range"))]
    pub age: Option<i32>,
    #[serde(rename = "materias_json", default)]
    #[schema(value_type = Vec<Object>)]
    pub subjects: Vec<Value>,
}

// Hand-written so the password never reaches the logs.
impl std::fmt::Debug for CreateTeacherDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateTeacherDto")
            .field("role", &self.role)
            .field("email", &self.email)
            .field("worker_id", &self.worker_id)
            .finish_non_exhaustive()
    }
}

/// Full overwrite of a teacher's editable fields. The `id` travels in the body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    pub id: i64,
    #[serde(rename = "id_trabajador")]
    #[validate(length(min = 1, message = "id_trabajador is required"))]
    pub worker_id: String,
    #[serde(rename = "rfc")]
    #[validate(length(min = 1, message = "rfc is required"))]
    pub tax_id: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "edad", default)]
    #[validate(range(min = 0, max = 150, message = "edad is out of range"))]
    pub age: Option<i32>,
    #[serde(rename = "materias_json")]
    #[schema(value_type = Vec<Object>)]
    pub subjects: Vec<Value>,
    #[validate(length(min = 1, max = 150, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150, message = "last_name is required"))]
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeacherCreatedResponse {
    pub maestro_created_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherUpdatedResponse {
    pub message: String,
    pub maestro: Teacher,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(subjects: &str) -> TeacherRow {
        TeacherRow {
            id: 3,
            user_id: 9,
            worker_id: "T-001".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1980, 5, 17),
            phone: "2221234567".to_string(),
            tax_id: "GOMA800517XX1".to_string(),
            office: "B-12".to_string(),
            research_area: "Compiladores".to_string(),
            age: Some(45),
            subjects: subjects.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            first_name: "Ana".to_string(),
            last_name: "Gómez".to_string(),
            email: "ana@escuela.mx".to_string(),
            is_active: true,
        }
    }

    fn valid_create() -> serde_json::Value {
        json!({
            "rol": "maestro",
            "first_name": "Ana",
            "last_name": "Gómez",
            "email": "ana@escuela.mx",
            "password": "supersecreto",
            "id_trabajador": "T-001",
            "fecha_nacimiento": "1980-05-17",
            "telefono": "2221234567",
            "rfc": "goma800517xx1",
            "cubiculo": "B-12",
            "area_investigacion": "Compiladores",
            "materias_json": ["Compiladores", "Automatas"]
        })
    }

    #[test]
    fn test_teacher_from_row_decodes_subjects() {
        let teacher = Teacher::from(row(r#"["Algebra","Calculo"]"#));
        assert_eq!(teacher.subjects, vec![json!("Algebra"), json!("Calculo")]);
        assert_eq!(teacher.user.id, 9);
    }

    #[test]
    fn test_teacher_from_row_malformed_subjects() {
        let teacher = Teacher::from(row("Algebra, Calculo"));
        assert!(teacher.subjects.is_empty());
    }

    #[test]
    fn test_teacher_serializes_wire_names() {
        let body = serde_json::to_value(Teacher::from(row("[]"))).unwrap();
        assert_eq!(body["id_trabajador"], "T-001");
        assert_eq!(body["rfc"], "GOMA800517XX1");
        assert_eq!(body["fecha_nacimiento"], "1980-05-17");
        assert_eq!(body["materias_json"], json!([]));
        assert_eq!(body["user"]["email"], "ana@escuela.mx");
    }

    #[test]
    fn test_create_dto_valid() {
        let dto: CreateTeacherDto = serde_json::from_value(valid_create()).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.subjects.len(), 2);
    }

    #[test]
    fn test_create_dto_defaults_role() {
        let mut payload = valid_create();
        payload.as_object_mut().unwrap().remove("rol");
        let dto: CreateTeacherDto = serde_json::from_value(payload).unwrap();
        assert_eq!(dto.role, role_groups::TEACHER);
    }

    #[test]
    fn test_create_dto_rejects_bad_email_and_short_password() {
        let mut payload = valid_create();
        payload["email"] = json!("not-an-email");
        payload["password"] = json!("short");
        let dto: CreateTeacherDto = serde_json::from_value(payload).unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_create_dto_debug_hides_password() {
        let dto: CreateTeacherDto = serde_json::from_value(valid_create()).unwrap();
        assert!(!format!("{:?}", dto).contains("supersecreto"));
    }

    #[test]
    fn test_update_dto_requires_subjects() {
        let payload = json!({
            "id": 1,
            "id_trabajador": "T-001",
            "rfc": "ABC",
            "telefono": "",
            "first_name": "Ana",
            "last_name": "Gómez"
        });
        assert!(serde_json::from_value::<UpdateTeacherDto>(payload).is_err());
    }
}
