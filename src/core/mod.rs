//! Core types shared by every module: the error taxonomy and its
//! user-facing rendering.

pub mod error;

pub use error::{DepsError, ErrorContext, user_friendly_error};
