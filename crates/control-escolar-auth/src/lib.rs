//! # Control Escolar Auth
//!
//! Authentication types and JWT utilities.
//!
//! - [`claims`]: JWT claim structure carried by access tokens
//! - [`jwt`]: Token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use control_escolar_auth::{create_access_token, verify_token};
//! use control_escolar_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "maestro@escuela.mx", vec!["maestro".into()], &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
