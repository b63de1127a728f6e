//! Shared domain types, configuration and errors for Docent, a client that
//! uploads one document to a remote coordinator and holds a grounded
//! question-answer conversation about it.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{CoordinatorConfig, DocentConfig, GeneralConfig};
pub use error::{DocentError, Result};
pub use types::*;
