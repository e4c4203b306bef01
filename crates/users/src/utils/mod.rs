//! Internal utilities for the users crate.

pub mod validation;

pub use validation::{validate_address, validate_email, validate_user_name};
