//! # Control Escolar Core
//!
//! Core types, errors, and utilities for the Control Escolar API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Serde helpers, including the codec for JSON stored in text columns
//!
//! # Example
//!
//! ```ignore
//! use control_escolar_core::errors::AppError;
//! use control_escolar_core::serde::{decode_json_list, encode_json_text};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Teacher not found"));
//!
//! let text = encode_json_text(&vec!["Algebra", "Calculus"])?;
//! let subjects = decode_json_list(&text);
//! ```

pub mod errors;
pub mod password;
pub mod serde;

pub use errors::{AppError, ErrorResponse};
pub use password::{hash_password, verify_password};
