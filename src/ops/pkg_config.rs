//! System library metadata through pkg-config.
//!
//! Every library is queried once per [`FlagCategory`], in the fixed order of
//! [`FLAG_QUERIES`]. Each query's output is split on whitespace and every
//! token loses the category's switch prefix (`-I`, `-L`, `-l`) before being
//! appended to the configuration.
//!
//! The first failed query ends the pass. Everything gathered up to that point
//! is kept and returned as [`Resolution::Partial`], so a missing optional
//! library never aborts the build.

use std::path::{Path, PathBuf};

use crate::core::config::{BuildConfig, FlagCategory};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::process::{ProcessBuilder, ProcessExecutor};

/// How one category is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagQuery {
    pub category: FlagCategory,
    /// pkg-config option selecting the category
    pub option: &'static str,
    /// Characters to drop from the front of every token
    pub strip: usize,
}

/// Query table, in the order queries are issued.
pub const FLAG_QUERIES: [FlagQuery; 5] = [
    FlagQuery {
        category: FlagCategory::IncludeDirs,
        option: "--cflags-only-I",
        strip: 2,
    },
    FlagQuery {
        category: FlagCategory::LibraryDirs,
        option: "--libs-only-L",
        strip: 2,
    },
    FlagQuery {
        category: FlagCategory::Libraries,
        option: "--libs-only-l",
        strip: 2,
    },
    FlagQuery {
        category: FlagCategory::ExtraCompileArgs,
        option: "--cflags-only-other",
        strip: 0,
    },
    FlagQuery {
        category: FlagCategory::ExtraLinkArgs,
        option: "--libs-only-other",
        strip: 0,
    },
];

/// The query that stopped a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub library: String,
    pub category: FlagCategory,
    pub command: String,
    pub reason: String,
}

impl QueryFailure {
    /// Warning shown to the user; the build carries on.
    pub fn to_diagnostic(&self, skipped: &[String]) -> Diagnostic {
        let mut diag = Diagnostic::warning(format!(
            "pkg-config could not resolve `{}`; continuing with partial flags",
            self.library
        ))
        .with_context(format!("query: {}", self.command))
        .with_context(self.reason.clone());

        if !skipped.is_empty() {
            diag = diag.with_context(format!("not queried: {}", skipped.join(", ")));
        }

        diag.with_suggestion(suggestions::INSTALL_LIBRARY)
            .with_suggestion(suggestions::INSTALL_PKG_CONFIG)
    }
}

/// Outcome of a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every library answered every query.
    Complete(BuildConfig),
    /// A query failed; `config` holds what was gathered before it.
    Partial {
        config: BuildConfig,
        failure: QueryFailure,
        /// Libraries after the failed one, never queried.
        skipped: Vec<String>,
    },
}

impl Resolution {
    pub fn config(&self) -> &BuildConfig {
        match self {
            Resolution::Complete(config) | Resolution::Partial { config, .. } => config,
        }
    }

    pub fn into_config(self) -> BuildConfig {
        match self {
            Resolution::Complete(config) | Resolution::Partial { config, .. } => config,
        }
    }

    pub fn failure(&self) -> Option<&QueryFailure> {
        match self {
            Resolution::Complete(_) => None,
            Resolution::Partial { failure, .. } => Some(failure),
        }
    }

    /// Libraries the pass never reached.
    pub fn skipped(&self) -> &[String] {
        match self {
            Resolution::Complete(_) => &[],
            Resolution::Partial { skipped, .. } => skipped,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Resolution::Complete(_))
    }
}

/// A pkg-config invocation setup.
#[derive(Debug, Clone)]
pub struct PkgConfig {
    program: PathBuf,
    optional_flag: Option<String>,
}

impl PkgConfig {
    pub fn new(program: impl AsRef<Path>) -> Self {
        PkgConfig {
            program: program.as_ref().to_path_buf(),
            optional_flag: None,
        }
    }

    /// Extra argument placed before the query option, e.g. `--static`.
    /// An empty flag is ignored.
    pub fn with_optional_flag(mut self, flag: Option<impl Into<String>>) -> Self {
        self.optional_flag = flag.map(Into::into).filter(|f: &String| !f.is_empty());
        self
    }

    /// Command for one (library, category) query.
    pub fn command(&self, query: &FlagQuery, library: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(self.optional_flag.iter())
            .arg(query.option)
            .arg(library)
    }

    /// Run one query and return its prefix-stripped tokens.
    pub fn query<E>(
        &self,
        executor: &E,
        query: &FlagQuery,
        library: &str,
    ) -> Result<Vec<String>, QueryFailure>
    where
        E: ProcessExecutor + ?Sized,
    {
        let cmd = self.command(query, library);
        let fail = |reason: String| QueryFailure {
            library: library.to_string(),
            category: query.category,
            command: cmd.display_command(),
            reason,
        };

        let output = executor.exec(&cmd).map_err(|e| fail(format!("{:#}", e)))?;
        if !output.success() {
            let stderr = output.stderr.trim();
            let reason = if stderr.is_empty() {
                format!("exited with code {:?}", output.code)
            } else {
                format!("exited with code {:?}: {}", output.code, stderr)
            };
            return Err(fail(reason));
        }

        Ok(output
            .stdout
            .split_whitespace()
            .map(|token| strip_chars(token, query.strip).to_string())
            .collect())
    }

    /// Query every library, appending into `base`.
    ///
    /// Libraries are processed in order and, within a library, categories in
    /// [`FLAG_QUERIES`] order. The first failure stops the pass.
    pub fn resolve<E>(&self, executor: &E, libraries: &[String], base: BuildConfig) -> Resolution
    where
        E: ProcessExecutor + ?Sized,
    {
        let mut config = base;

        for (index, library) in libraries.iter().enumerate() {
            for query in &FLAG_QUERIES {
                match self.query(executor, query, library) {
                    Ok(items) => {
                        tracing::debug!(
                            "{} {}: {} item(s)",
                            library,
                            query.category,
                            items.len()
                        );
                        config.extend(query.category, items);
                    }
                    Err(failure) => {
                        let skipped = libraries[index + 1..].to_vec();
                        tracing::warn!(
                            skipped = skipped.len(),
                            "pkg-config query for `{}` ({}) failed; stopping with partial flags",
                            failure.library,
                            failure.category
                        );
                        return Resolution::Partial {
                            config,
                            failure,
                            skipped,
                        };
                    }
                }
            }
        }

        Resolution::Complete(config)
    }
}

/// Drop the first `n` characters of `token`.
fn strip_chars(token: &str, n: usize) -> &str {
    match token.char_indices().nth(n) {
        Some((idx, _)) => &token[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Define;
    use crate::test_support::{MockExecutor, MockProcessOutput};

    fn libs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// osd resolves fully: one include path and one library.
    fn expect_osd(exec: &MockExecutor) {
        exec.expect(
            "pkg-config --cflags-only-I osd",
            MockProcessOutput::success("-I/usr/include/osd\n"),
        );
        exec.expect("pkg-config --libs-only-L osd", MockProcessOutput::success("\n"));
        exec.expect(
            "pkg-config --libs-only-l osd",
            MockProcessOutput::success("-losd\n"),
        );
        exec.expect("pkg-config --cflags-only-other osd", MockProcessOutput::success(""));
        exec.expect("pkg-config --libs-only-other osd", MockProcessOutput::success(""));
    }

    #[test]
    fn test_query_table_order_and_strip() {
        let order: Vec<_> = FLAG_QUERIES.iter().map(|q| q.category).collect();
        assert_eq!(order, FlagCategory::ALL);
        let strips: Vec<_> = FLAG_QUERIES.iter().map(|q| q.strip).collect();
        assert_eq!(strips, [2, 2, 2, 0, 0]);
    }

    #[test]
    fn test_strip_chars() {
        assert_eq!(strip_chars("-I/usr/include", 2), "/usr/include");
        assert_eq!(strip_chars("-pthread", 0), "-pthread");
        assert_eq!(strip_chars("-l", 2), "");
        assert_eq!(strip_chars("-Iéa", 3), "a");
    }

    #[test]
    fn test_resolve_complete() {
        let exec = MockExecutor::new();
        exec.expect(
            "pkg-config --cflags-only-I glib-2.0",
            MockProcessOutput::success(
                "-I/usr/include/glib-2.0 -I/usr/lib/glib-2.0/include\n",
            ),
        );
        exec.expect(
            "pkg-config --libs-only-L glib-2.0",
            MockProcessOutput::success("-L/opt/glib/lib\n"),
        );
        exec.expect(
            "pkg-config --libs-only-l glib-2.0",
            MockProcessOutput::success("-lglib-2.0\n"),
        );
        exec.expect(
            "pkg-config --cflags-only-other glib-2.0",
            MockProcessOutput::success("-pthread -DG_DISABLE_ASSERT\n"),
        );
        exec.expect(
            "pkg-config --libs-only-other glib-2.0",
            MockProcessOutput::success("-pthread\n"),
        );

        let resolution =
            PkgConfig::new("pkg-config").resolve(&exec, &libs(&["glib-2.0"]), BuildConfig::default());

        assert!(resolution.is_complete());
        let config = resolution.into_config();
        assert_eq!(
            config.include_dirs,
            ["/usr/include/glib-2.0", "/usr/lib/glib-2.0/include"]
        );
        assert_eq!(config.library_dirs, ["/opt/glib/lib"]);
        assert_eq!(config.libraries, ["glib-2.0"]);
        // "other" flags pass through verbatim
        assert_eq!(config.extra_compile_args, ["-pthread", "-DG_DISABLE_ASSERT"]);
        assert_eq!(config.extra_link_args, ["-pthread"]);
    }

    #[test]
    fn test_accumulation_follows_query_order() {
        let exec = MockExecutor::new();
        expect_osd(&exec);
        exec.expect(
            "pkg-config --cflags-only-I libglip",
            MockProcessOutput::success("-I/usr/include/glip"),
        );
        exec.expect_prefix("pkg-config --libs-only-l libglip", MockProcessOutput::success("-lglip"));
        exec.expect_prefix("pkg-config", MockProcessOutput::success(""));

        let config = PkgConfig::new("pkg-config")
            .resolve(&exec, &libs(&["osd", "libglip"]), BuildConfig::default())
            .into_config();

        assert_eq!(config.include_dirs, ["/usr/include/osd", "/usr/include/glip"]);
        assert_eq!(config.libraries, ["osd", "glip"]);

        let calls = exec.calls();
        assert_eq!(calls.len(), 10);
        assert_eq!(calls[0], "pkg-config --cflags-only-I osd");
        assert_eq!(calls[4], "pkg-config --libs-only-other osd");
        assert_eq!(calls[5], "pkg-config --cflags-only-I libglip");
    }

    #[test]
    fn test_failure_keeps_partial_result_and_stops() {
        let exec = MockExecutor::new();
        expect_osd(&exec);
        exec.expect(
            "pkg-config --cflags-only-I libglip",
            MockProcessOutput::failure(
                1,
                "Package libglip was not found in the pkg-config search path.",
            ),
        );

        let base = BuildConfig::with_macros(vec![Define::key_value("OSD_PY", "1")]);
        let resolution = PkgConfig::new("pkg-config").resolve(
            &exec,
            &libs(&["osd", "libglip", "czmq"]),
            base,
        );

        let failure = resolution.failure().unwrap().clone();
        assert_eq!(failure.library, "libglip");
        assert_eq!(failure.category, FlagCategory::IncludeDirs);
        assert!(failure.reason.contains("was not found"));

        let config = resolution.clone().into_config();
        assert_eq!(config.include_dirs, ["/usr/include/osd"]);
        assert_eq!(config.libraries, ["osd"]);
        assert_eq!(config.define_macros, [Define::key_value("OSD_PY", "1")]);

        assert_eq!(resolution.skipped(), ["czmq"]);

        // Nothing after the failed query runs, czmq included
        assert_eq!(exec.calls().len(), 6);
        assert!(exec.calls().iter().all(|c| !c.contains("czmq")));
    }

    #[test]
    fn test_repeated_library_skips_only_what_follows_the_failure() {
        let exec = MockExecutor::new();
        // The first `osd` pass answers, the second fails on its first query
        exec.expect_once(
            "pkg-config --cflags-only-I osd",
            MockProcessOutput::success("-I/usr/include/osd"),
        );
        exec.expect(
            "pkg-config --cflags-only-I osd",
            MockProcessOutput::failure(1, "Package osd was not found"),
        );
        exec.expect_prefix("pkg-config", MockProcessOutput::success(""));

        let resolution = PkgConfig::new("pkg-config").resolve(
            &exec,
            &libs(&["osd", "glip", "osd", "czmq"]),
            BuildConfig::default(),
        );

        assert_eq!(resolution.failure().unwrap().library, "osd");
        assert_eq!(resolution.skipped(), ["czmq"]);
        assert_eq!(resolution.config().include_dirs, ["/usr/include/osd"]);
        assert_eq!(exec.calls().len(), 11);
    }

    #[test]
    fn test_failure_mid_library_keeps_earlier_categories() {
        let exec = MockExecutor::new();
        exec.expect(
            "pkg-config --cflags-only-I osd",
            MockProcessOutput::success("-I/usr/include/osd"),
        );
        exec.expect("pkg-config --libs-only-L osd", MockProcessOutput::failure(1, ""));

        let resolution =
            PkgConfig::new("pkg-config").resolve(&exec, &libs(&["osd"]), BuildConfig::default());

        assert_eq!(resolution.failure().unwrap().category, FlagCategory::LibraryDirs);
        assert_eq!(resolution.config().include_dirs, ["/usr/include/osd"]);
    }

    #[test]
    fn test_missing_tool_is_partial_not_error() {
        let exec = MockExecutor::new();
        exec.expect_spawn_error("pkg-config", "No such file or directory");

        let base = BuildConfig::with_macros(vec![Define::flag("NDEBUG")]);
        let resolution = PkgConfig::new("pkg-config").resolve(&exec, &libs(&["osd"]), base);

        assert!(!resolution.is_complete());
        let config = resolution.into_config();
        assert!(config.has_no_flags());
        assert_eq!(config.define_macros, [Define::flag("NDEBUG")]);
    }

    #[test]
    fn test_base_entries_stay_in_front() {
        let exec = MockExecutor::new();
        expect_osd(&exec);

        let mut base = BuildConfig::default();
        base.extend(FlagCategory::IncludeDirs, ["vendor/include"]);

        let config = PkgConfig::new("pkg-config")
            .resolve(&exec, &libs(&["osd"]), base)
            .into_config();
        assert_eq!(config.include_dirs, ["vendor/include", "/usr/include/osd"]);
    }

    #[test]
    fn test_optional_flag_precedes_option() {
        let exec = MockExecutor::new();
        exec.expect_prefix("pkgconf --static", MockProcessOutput::success(""));

        let pkg = PkgConfig::new("pkgconf").with_optional_flag(Some("--static"));
        let resolution = pkg.resolve(&exec, &libs(&["osd"]), BuildConfig::default());

        assert!(resolution.is_complete());
        assert_eq!(exec.calls()[0], "pkgconf --static --cflags-only-I osd");
    }

    #[test]
    fn test_empty_optional_flag_is_dropped() {
        let pkg = PkgConfig::new("pkg-config").with_optional_flag(Some(""));
        let cmd = pkg.command(&FLAG_QUERIES[0], "osd");
        assert_eq!(cmd.display_command(), "pkg-config --cflags-only-I osd");
    }

    #[test]
    fn test_no_libraries_is_complete() {
        let exec = MockExecutor::new();
        let resolution = PkgConfig::new("pkg-config").resolve(&exec, &[], BuildConfig::default());
        assert!(resolution.is_complete());
        assert!(resolution.skipped().is_empty());
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_failure_diagnostic() {
        let failure = QueryFailure {
            library: "libglip".to_string(),
            category: FlagCategory::IncludeDirs,
            command: "pkg-config --cflags-only-I libglip".to_string(),
            reason: "exited with code Some(1)".to_string(),
        };
        let output = failure.to_diagnostic(&libs(&["czmq"])).format(false);
        assert!(output.contains("could not resolve `libglip`"));
        assert!(output.contains("not queried: czmq"));
    }
}
