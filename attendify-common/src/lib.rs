//! # Attendify Common Library
//!
//! Shared code for the Attendify attendance service:
//! - Error taxonomy
//! - Student identity parsing and division normalization
//! - Configuration loading
//! - Database initialization and row models

pub mod config;
pub mod db;
pub mod error;
pub mod identity;

pub use error::{Error, Result};
