use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_teacher, delete_teacher, get_teacher, get_teachers, update_teacher};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/all", get(get_teachers))
        .route(
            "/",
            get(get_teacher)
                .post(create_teacher)
                .put(update_teacher)
                .delete(delete_teacher),
        )
}
