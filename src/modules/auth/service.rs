use sqlx::PgPool;
use tracing::instrument;

use control_escolar_auth::create_access_token;
use control_escolar_config::JwtConfig;
use control_escolar_core::{AppError, verify_password};
use control_escolar_models::UserSummary;

use super::model::{LoginRequest, LoginResponse};

pub struct AuthService;

impl AuthService {
    /// Exchanges email and password of an active account for an access token.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: i64,
            first_name: String,
            last_name: String,
            email: String,
            password: String,
            is_active: bool,
        }

        let account = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, first_name, last_name, email, password, is_active FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .filter(|account| account.is_active)
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !verify_password(&dto.password, &account.password)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let roles = sqlx::query_scalar::<_, String>(
            r#"SELECT r.name
               FROM roles r
               JOIN user_roles ur ON ur.role_id = r.id
               WHERE ur.user_id = $1
               ORDER BY r.name"#,
        )
        .bind(account.id)
        .fetch_all(db)
        .await?;

        let access_token = create_access_token(account.id, &account.email, roles, jwt_config)?;

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user: UserSummary {
                id: account.id,
                first_name: account.first_name,
                last_name: account.last_name,
                email: account.email,
                is_active: account.is_active,
            },
        })
    }
}
