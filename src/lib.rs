//! # Control Escolar API
//!
//! REST backend for a school administration system, built with Axum and
//! PostgreSQL. It manages teachers ("maestros") with their login accounts
//! and courses ("materias") that may be assigned to a teacher.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # JWT extractor
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Login
//! │   ├── teachers/    # /api/maestros
//! │   └── courses/     # /api/materias
//! ├── docs.rs          # OpenAPI document
//! ├── logging.rs       # Request logging and subscriber setup
//! ├── router.rs        # Route tree, CORS and docs UIs
//! └── validator.rs     # JSON body extractors
//! ```
//!
//! Each feature module follows the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business logic and SQL
//! - `model.rs`: Re-exports from `control-escolar-models`
//! - `router.rs`: Axum router configuration
//!
//! Shared pieces live in workspace crates: errors, password hashing and
//! JSON-column helpers in `control-escolar-core`, environment config in
//! `control-escolar-config`, pool setup and role groups in
//! `control-escolar-db`, JWT handling in `control-escolar-auth`, and the
//! data types in `control-escolar-models`.
//!
//! ## Authentication
//!
//! `POST /api/auth/login` returns a bearer token. Every teacher and course
//! endpoint requires it, except teacher registration (`POST /api/maestros`).

pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use control_escolar_auth;
pub use control_escolar_config;
pub use control_escolar_core;
pub use control_escolar_db;
pub use control_escolar_models;
