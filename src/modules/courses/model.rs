pub use control_escolar_models::common::{DeletedResponse, IdQuery};
pub use control_escolar_models::courses::*;
