//! Cython translation step.
//!
//! Turns the `.pyx` source of an extension into the `.c` file the packaging
//! tool compiles, and points the descriptor at the generated file.

use std::path::{Path, PathBuf};

use crate::core::descriptor::{ExtensionDescriptor, SourceKind};
use crate::core::toggle::Toggles;
use crate::util::config::TranslateConfig;
use crate::util::diagnostic::ExtError;
use crate::util::process::{find_executable, ProcessBuilder, ProcessExecutor};

/// Compiler directives handed to the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerDirectives {
    pub language_level: u8,
    pub embed_signature: bool,
    /// Compile line-trace hooks in (coverage)
    pub line_trace: bool,
}

impl CompilerDirectives {
    pub fn new(config: &TranslateConfig, toggles: &Toggles) -> Self {
        CompilerDirectives {
            language_level: config.language_level,
            embed_signature: config.embed_signature,
            line_trace: toggles.coverage,
        }
    }

    /// Directives as `-X name=value` arguments.
    pub fn to_args(&self) -> Vec<String> {
        let directives = [
            format!("language_level={}", self.language_level),
            format!("embedsignature={}", py_bool(self.embed_signature)),
            format!("linetrace={}", py_bool(self.line_trace)),
        ];
        directives
            .into_iter()
            .flat_map(|d| ["-X".to_string(), d])
            .collect()
    }
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Something that can turn a Cython-sourced descriptor into a C-sourced one.
pub trait Translator {
    fn translate(
        &self,
        descriptor: ExtensionDescriptor,
        directives: &CompilerDirectives,
    ) -> Result<ExtensionDescriptor, ExtError>;
}

/// Find the translator program.
///
/// A bare name is looked up in PATH; anything with a directory component
/// must point at an existing file.
pub fn locate_translator(program: &Path) -> Result<PathBuf, ExtError> {
    let has_dir = program.components().count() > 1 || program.is_absolute();
    let found = if has_dir {
        program.is_file().then(|| program.to_path_buf())
    } else {
        find_executable(program)
    };

    found.ok_or_else(|| ExtError::TranslatorUnavailable {
        program: program.to_path_buf(),
    })
}

/// Translator that runs the `cython` command line.
pub struct CythonTranslator<'a, E: ProcessExecutor + ?Sized> {
    program: PathBuf,
    executor: &'a E,
}

impl<'a, E: ProcessExecutor + ?Sized> CythonTranslator<'a, E> {
    /// Use an already located program.
    pub fn new(program: impl Into<PathBuf>, executor: &'a E) -> Self {
        CythonTranslator {
            program: program.into(),
            executor,
        }
    }

    /// Locate `program` and fail with [`ExtError::TranslatorUnavailable`]
    /// if it cannot be found.
    pub fn locate(program: &Path, executor: &'a E) -> Result<Self, ExtError> {
        Ok(Self::new(locate_translator(program)?, executor))
    }

    /// Command translating `input` into `output`.
    pub fn command(&self, input: &Path, output: &Path, directives: &CompilerDirectives) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(directives.to_args())
            .arg(input)
            .arg("-o")
            .arg(output)
    }
}

impl<E: ProcessExecutor + ?Sized> Translator for CythonTranslator<'_, E> {
    fn translate(
        &self,
        descriptor: ExtensionDescriptor,
        directives: &CompilerDirectives,
    ) -> Result<ExtensionDescriptor, ExtError> {
        if !descriptor.needs_translation() {
            return Ok(descriptor);
        }

        let input = descriptor.source.clone();
        if !input.is_file() {
            return Err(ExtError::MissingSource { path: input });
        }
        let output = input.with_extension(SourceKind::C.extension());

        let cmd = self.command(&input, &output, directives);
        tracing::info!("Cythonizing {} -> {}", input.display(), output.display());

        let result = self
            .executor
            .exec(&cmd)
            .map_err(|_| ExtError::TranslatorUnavailable {
                program: self.program.clone(),
            })?;

        if !result.success() {
            let stderr = result.stderr.trim();
            return Err(ExtError::TranslationFailed {
                command: cmd.display_command(),
                code: result.code,
                stderr: (!stderr.is_empty()).then(|| stderr.to_string()),
            });
        }

        Ok(ExtensionDescriptor {
            source: output,
            generated_from: Some(input),
            ..descriptor
        })
    }
}
