mod common;

use axum::http::StatusCode;
use common::{
    TestUser, admin_auth, bearer_token, body_json, create_test_course, create_test_teacher,
    empty_request, generate_unique_email, generate_unique_nrc, json_request, setup_test_app,
};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

fn create_payload(email: &str) -> Value {
    json!({
        "rol": "maestro",
        "first_name": "Ana",
        "last_name": "Gómez",
        "email": email,
        "password": "supersecreto",
        "id_trabajador": "T-100",
        "fecha_nacimiento": "1980-05-17",
        "telefono": "2221234567",
        "rfc": "goma800517xx1",
        "cubiculo": "B-12",
        "area_investigacion": "Compiladores",
        "edad": 45,
        "materias_json": ["Compiladores", "Automatas"]
    })
}

async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_without_token(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let response = app
        .oneshot(json_request("POST", "/api/maestros", None, &create_payload(&email)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let teacher_id = body["maestro_created_id"].as_i64().unwrap();

    let role: String = sqlx::query_scalar(
        r#"SELECT r.name FROM roles r
           JOIN user_roles ur ON ur.role_id = r.id
           JOIN teachers t ON t.user_id = ur.user_id
           WHERE t.id = $1"#,
    )
    .bind(teacher_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(role, "maestro");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_created_teacher_is_retrievable(pool: PgPool) {
    let auth = admin_auth(&pool).await;
    let email = generate_unique_email();

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request("POST", "/api/maestros", None, &create_payload(&email)))
        .await
        .unwrap();
    let teacher_id = body_json(response).await["maestro_created_id"]
        .as_i64()
        .unwrap();

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/api/maestros?id={}", teacher_id),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], teacher_id);
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["first_name"], "Ana");
    assert_eq!(body["id_trabajador"], "T-100");
    assert_eq!(body["fecha_nacimiento"], "1980-05-17");
    assert_eq!(body["rfc"], "GOMA800517XX1");
    assert_eq!(body["edad"], 45);
    assert_eq!(body["materias_json"], json!(["Compiladores", "Automatas"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_duplicate_email_rolls_back(pool: PgPool) {
    let email = generate_unique_email();

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request("POST", "/api/maestros", None, &create_payload(&email)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request("POST", "/api/maestros", None, &create_payload(&email)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], format!("Username {} is already taken", email));

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM teachers").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_missing_field(pool: PgPool) {
    let mut payload = create_payload(&generate_unique_email());
    payload.as_object_mut().unwrap().remove("rfc");

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request("POST", "/api/maestros", None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "rfc is required");
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_invalid_email(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/maestros",
            None,
            &create_payload("not-an-email"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_empty_required_field(pool: PgPool) {
    for field in ["first_name", "last_name", "id_trabajador", "rfc"] {
        let mut payload = create_payload(&generate_unique_email());
        payload[field] = json!("");

        let app = setup_test_app(pool.clone());
        let response = app
            .oneshot(json_request("POST", "/api/maestros", None, &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {}", field);

        let body = body_json(response).await;
        assert_eq!(body["error"], format!("{} is required", field));
    }

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM teachers").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_only_active_teachers_in_id_order(pool: PgPool) {
    let auth = admin_auth(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let first = create_test_teacher(&mut tx, "AAA010101AAA", "[]").await;
    let inactive = create_test_teacher(&mut tx, "BBB010101BBB", "[]").await;
    let third = create_test_teacher(&mut tx, "CCC010101CCC", "[]").await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(inactive.user_id)
        .execute(&mut *tx)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(empty_request("GET", "/api/maestros/all", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first.id, third.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_subjects_decode_to_empty_list(pool: PgPool) {
    let auth = admin_auth(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_teacher(&mut tx, "AAA010101AAA", "['Algebra'").await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/api/maestros?id={}", teacher.id),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["materias_json"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_unknown_teacher(pool: PgPool) {
    let auth = admin_auth(&pool).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(empty_request("GET", "/api/maestros?id=9999", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_teacher_uppercases_tax_id(pool: PgPool) {
    let auth = admin_auth(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_teacher(&mut tx, "AAA010101AAA", r#"["Algebra"]"#).await;
    tx.commit().await.unwrap();

    let payload = json!({
        "id": teacher.id,
        "id_trabajador": "T-200",
        "rfc": "lopj750101ab2",
        "telefono": "5550001111",
        "edad": 50,
        "materias_json": ["Redes"],
        "first_name": "Juan",
        "last_name": "López"
    });

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request("PUT", "/api/maestros", Some(&auth), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Teacher updated successfully");
    assert_eq!(body["maestro"]["rfc"], "LOPJ750101AB2");
    assert_eq!(body["maestro"]["id_trabajador"], "T-200");
    assert_eq!(body["maestro"]["materias_json"], json!(["Redes"]));
    assert_eq!(body["maestro"]["user"]["first_name"], "Juan");
    assert_eq!(body["maestro"]["user"]["last_name"], "López");

    let stored: String = sqlx::query_scalar("SELECT tax_id FROM teachers WHERE id = $1")
        .bind(teacher.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "LOPJ750101AB2");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_teacher_requires_subjects(pool: PgPool) {
    let auth = admin_auth(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_teacher(&mut tx, "AAA010101AAA", "[]").await;
    tx.commit().await.unwrap();

    let payload = json!({
        "id": teacher.id,
        "id_trabajador": "T-200",
        "rfc": "ABC",
        "telefono": "",
        "first_name": "Juan",
        "last_name": "López"
    });

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request("PUT", "/api/maestros", Some(&auth), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "materias_json is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_unknown_teacher(pool: PgPool) {
    let auth = admin_auth(&pool).await;

    let payload = json!({
        "id": 9999,
        "id_trabajador": "T-200",
        "rfc": "ABC",
        "telefono": "",
        "materias_json": [],
        "first_name": "Juan",
        "last_name": "López"
    });

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request("PUT", "/api/maestros", Some(&auth), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_teacher_removes_account_and_unlinks_courses(pool: PgPool) {
    let auth = admin_auth(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_teacher(&mut tx, "AAA010101AAA", "[]").await;
    let course_id =
        create_test_course(&mut tx, &generate_unique_nrc(), "[]", Some(teacher.id)).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/maestros?id={}", teacher.id),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "details": "Teacher deleted" })
    );

    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1")
        .bind(teacher.user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 0);

    let teacher_ref: Option<i64> =
        sqlx::query_scalar("SELECT teacher_id FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(teacher_ref, None);

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/api/maestros?id={}", teacher.id),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_unknown_teacher(pool: PgPool) {
    let auth = admin_auth(&pool).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(empty_request("DELETE", "/api/maestros?id=9999", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_teacher_token_is_rejected(pool: PgPool) {
    let auth = admin_auth(&pool).await;

    let mut tx = pool.begin().await.unwrap();
    let teacher = create_test_teacher(&mut tx, "AAA010101AAA", "[]").await;
    tx.commit().await.unwrap();

    let teacher_auth = bearer_token(&TestUser {
        id: teacher.user_id,
        email: teacher.email.clone(),
        password: "password123".to_string(),
    });

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(empty_request("GET", "/api/maestros/all", Some(&teacher_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/maestros?id={}", teacher.id),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(empty_request("GET", "/api/maestros/all", Some(&teacher_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Account is inactive or no longer exists");
}
