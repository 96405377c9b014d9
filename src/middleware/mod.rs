//! Middleware modules for request processing.
//!
//! This module contains extractors for handling authentication and role
//! checks on protected routes.
//!
//! # Modules
//!
//! - [`auth`]: JWT authentication extractor
//! - [`role`]: Role-gating extractors built on top of [`auth`]
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor validates the JWT and extracts claims
//! 3. Role extractors check the role claim against the route's requirement
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::RequireTeacher;
//!
//! // Any valid token
//! async fn list_groups(auth_user: AuthUser) -> impl IntoResponse {
//!     let role = auth_user.role();
//!     // ...
//! }
//!
//! // Teacher tokens only
//! async fn assign_student(_teacher: RequireTeacher) -> impl IntoResponse {
//!     // Only executes for tokens carrying the Teacher role
//! }
//! ```

pub mod auth;
pub mod role;
