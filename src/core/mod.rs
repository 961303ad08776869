//! Core data structures for extconf.
//!
//! - Build toggles
//! - Flag categories and the accumulated build configuration
//! - The extension descriptor
//! - The `Extconf.toml` manifest

pub mod config;
pub mod descriptor;
pub mod manifest;
pub mod toggle;

pub use config::{BuildConfig, Define, FlagCategory};
pub use descriptor::{ExtensionDescriptor, SourceKind};
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use toggle::{BuildToggle, Toggles};
