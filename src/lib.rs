//! Kubernetes Secret helpers for cluster test automation
//!
//! Fetches Secrets from downstream clusters through a dynamic client and
//! builds Secret templates for tests to create.

pub mod clients;
pub mod config;
pub mod error;
pub mod secrets;

pub use error::{Error, Result};
