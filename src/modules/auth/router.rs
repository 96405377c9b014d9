use axum::{
    Router,
    routing::{patch, post},
};

use crate::state::AppState;

use super::controller::{forgot_password, login_user, register_user, reset_password, verify_user};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/verifyUser", post(verify_user))
        .route("/login", post(login_user))
        .route("/forgot_password", post(forgot_password))
        .route("/reset_password", patch(reset_password))
}
