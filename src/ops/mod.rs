//! High-level operations.
//!
//! This module contains the implementation of extconf commands.

pub mod assemble;
pub mod doctor;
pub mod extconf_build;
pub mod pkg_config;
pub mod toggles;

pub use assemble::{assemble, COVERAGE_MACRO};
pub use doctor::{doctor, format_report, DoctorOptions, DoctorReport};
pub use extconf_build::{build, resolve_extension, BuildOptions, BuildOutcome};
pub use pkg_config::{PkgConfig, QueryFailure, Resolution, FLAG_QUERIES};
pub use toggles::resolve_toggles;
