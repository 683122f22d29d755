#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use control_escolar::control_escolar_auth::create_access_token;
use control_escolar::control_escolar_config::{CorsConfig, JwtConfig};
use control_escolar::control_escolar_core::hash_password;
use control_escolar::control_escolar_db::{add_user_to_role_group, ensure_role_group};
use control_escolar::router::init_router;
use control_escolar::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub password: String,
}

pub struct TestTeacher {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn generate_unique_nrc() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_uppercase()
}

/// Creates an active account in `role_group`.
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    password: &str,
    role_group: &str,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO users (username, email, first_name, last_name, password, is_active)
           VALUES ($1, $1, 'Test', 'User', $2, TRUE)
           RETURNING id"#,
    )
    .bind(email)
    .bind(&hashed)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    let role_id = ensure_role_group(&mut **tx, role_group).await.unwrap();
    add_user_to_role_group(&mut **tx, id, role_id).await.unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Creates a teacher profile on a fresh account.
pub async fn create_test_teacher(
    tx: &mut Transaction<'_, Postgres>,
    tax_id: &str,
    subjects: &str,
) -> TestTeacher {
    let email = generate_unique_email();
    let user = create_test_user(tx, &email, "password123", "maestro").await;

    let id = sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO teachers (user_id, worker_id, phone, tax_id, office, research_area, subjects)
           VALUES ($1, 'T-001', '2221234567', $2, 'B-12', 'Compiladores', $3)
           RETURNING id"#,
    )
    .bind(user.id)
    .bind(tax_id)
    .bind(subjects)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestTeacher {
        id,
        user_id: user.id,
        email,
    }
}

/// Inserts a course row directly. `schedule_days` is stored as given.
pub async fn create_test_course(
    tx: &mut Transaction<'_, Postgres>,
    nrc: &str,
    schedule_days: &str,
    teacher_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO courses (nrc, name, section, schedule_days, teacher_id)
           VALUES ($1, 'Algebra', '001', $2, $3)
           RETURNING id"#,
    )
    .bind(nrc)
    .bind(schedule_days)
    .bind(teacher_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

/// Issues a token for an existing account without going through login.
pub fn bearer_token(user: &TestUser) -> String {
    let token = create_access_token(user.id, &user.email, vec![], &test_jwt_config()).unwrap();
    format!("Bearer {}", token)
}

/// Creates an administrator account and returns its bearer header value.
pub async fn admin_auth(pool: &PgPool) -> String {
    let mut tx = pool.begin().await.unwrap();
    let user =
        create_test_user(&mut tx, &generate_unique_email(), "password123", "administrador").await;
    tx.commit().await.unwrap();
    bearer_token(&user)
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
