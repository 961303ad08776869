//! Shared utilities

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod process;

pub use config::Config;
pub use context::{BuildEnv, GlobalContext};
pub use diagnostic::{Diagnostic, ExtError};
