//! Teacher data models and DTOs.
//!
//! Re-exported from the `control-escolar-models` crate.

pub use control_escolar_models::common::{DeletedResponse, IdQuery};
pub use control_escolar_models::teachers::*;
