use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use control_escolar_auth::{Claims, verify_token};
use control_escolar_core::AppError;

use crate::state::AppState;

/// Extractor that validates the JWT, checks that the account is still
/// active, and provides the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))?;

        // Deleted or deactivated accounts lose access before the token expires.
        let active = sqlx::query_scalar::<_, bool>("SELECT is_active FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?
            .unwrap_or(false);

        if !active {
            return Err(AppError::unauthorized("Account is inactive or no longer exists"));
        }

        Ok(AuthUser(claims))
    }
}
