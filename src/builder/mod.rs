//! Source translation.
//!
//! Turns the annotated Cython source into the C file that gets compiled.

pub mod cython;

pub use cython::{locate_translator, CompilerDirectives, CythonTranslator, Translator};
