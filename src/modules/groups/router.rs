use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    add_group, add_student_to_group, delete_group, get_group_by_id, get_groups,
};

pub fn init_groups_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_groups).post(add_group))
        .route("/{id}", get(get_group_by_id).delete(delete_group))
        .route(
            "/add_student/{student_id}/to_group/{group_id}",
            patch(add_student_to_group),
        )
}
