//! extconf - build configuration for Cython extensions linked against
//! system libraries.
//!
//! This crate resolves the build toggles, queries pkg-config for every
//! required library, and assembles the extension descriptor the packaging
//! tool compiles from, translating the Cython source first when asked.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for extconf unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a scripted process executor standing in for pkg-config and
/// Cython.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    config::BuildConfig, descriptor::ExtensionDescriptor, manifest::Manifest, toggle::Toggles,
};
pub use util::context::{BuildEnv, GlobalContext};
pub use util::diagnostic::ExtError;
