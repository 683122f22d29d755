//! # Control Escolar CLI
//!
//! Administrative tasks that run outside the HTTP server: bootstrapping an
//! administrator account and seeding fake teachers and courses for
//! development.
//!
//! ## Usage
//!
//! ```ignore
//! use control_escolar_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::new(20, 60)).await?;
//! ```

pub mod admin;
pub mod seeder;
