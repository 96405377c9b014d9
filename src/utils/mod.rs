//! Utility modules for the Rollbook API.
//!
//! This module contains shared utilities used throughout the application:
//!
//! - [`email`]: Email sending utilities using SMTP
//! - [`errors`]: Application error types and handling
//! - [`jwt`]: JWT token creation and verification
//! - [`pagination`]: Request pagination utilities
//! - [`password`]: Password hashing, verification and the password policy

pub mod email;
pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod password;
