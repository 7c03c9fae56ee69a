//! # Orrery Common Library
//!
//! Shared code for the orrery gateway:
//! - Error taxonomy
//! - API request/response types
//! - Configuration loading

pub mod api;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
