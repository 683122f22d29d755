//! Login models.
//!
//! Re-exported from the `control-escolar-models` crate.

pub use control_escolar_models::auth::*;
