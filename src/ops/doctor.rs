//! Environment health checks.
//!
//! The `doctor` command verifies that the external tools an extension build
//! depends on are installed, and that pkg-config knows every library the
//! manifest asks for.
//!
//! ## Checks Performed
//!
//! - pkg-config availability (required when libraries are listed)
//! - Cython availability (required only when regenerating)
//! - One `pkg-config --modversion` per manifest library (optional)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::builder::cython::locate_translator;
use crate::core::toggle::Toggles;
use crate::util::process::{find_executable, ProcessBuilder, ProcessExecutor};

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            ..Self::pass(name, message)
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set whether the check is required.
    pub fn required_if(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: HashMap<String, String>,
}

impl DoctorReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get the count of required failed checks.
    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Options for the doctor command.
#[derive(Debug, Clone)]
pub struct DoctorOptions {
    pub toggles: Toggles,
    pub pkg_config: PathBuf,
    pub cython: PathBuf,
    /// Libraries from the manifest, if one was found
    pub libraries: Vec<String>,
}

/// Run every check.
pub fn doctor<E>(options: &DoctorOptions, executor: &E) -> DoctorReport
where
    E: ProcessExecutor + ?Sized,
{
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report.environment.insert(
        "regenerate".to_string(),
        options.toggles.regenerate.to_string(),
    );
    report
        .environment
        .insert("coverage".to_string(), options.toggles.coverage.to_string());

    let pkg_config =
        check_pkg_config(&options.pkg_config, executor).required_if(!options.libraries.is_empty());
    let pkg_config_ok = pkg_config.passed;
    report.add(pkg_config);

    report.add(check_cython(&options.cython, executor).required_if(options.toggles.regenerate));

    if pkg_config_ok {
        for library in &options.libraries {
            report.add(check_library(&options.pkg_config, library, executor));
        }
    }

    report.total_duration = start.elapsed();
    report
}

/// Run `<program> --version` and return its first output line.
fn tool_version<E>(program: &Path, executor: &E) -> Option<String>
where
    E: ProcessExecutor + ?Sized,
{
    let output = executor
        .exec(&ProcessBuilder::new(program).arg("--version"))
        .ok()?;
    if !output.success() {
        return None;
    }
    // Older Cython releases print the version on stderr
    let text = if output.stdout.trim().is_empty() {
        &output.stderr
    } else {
        &output.stdout
    };
    Some(text.lines().next().unwrap_or("").trim().to_string())
}

fn check_pkg_config<E>(program: &Path, executor: &E) -> CheckResult
where
    E: ProcessExecutor + ?Sized,
{
    let start = Instant::now();

    match tool_version(program, executor) {
        Some(version) => {
            let mut check =
                CheckResult::pass("pkg-config", format!("{} is available", program.display()))
                    .with_version(version);
            if let Some(path) = find_executable(program) {
                check = check.with_path(path);
            }
            check.with_duration(start.elapsed())
        }
        None => CheckResult::fail(
            "pkg-config",
            format!(
                "{} not found; library flags cannot be discovered",
                program.display()
            ),
        )
        .with_duration(start.elapsed()),
    }
}

fn check_cython<E>(program: &Path, executor: &E) -> CheckResult
where
    E: ProcessExecutor + ?Sized,
{
    let start = Instant::now();

    let path = match locate_translator(program) {
        Ok(path) => path,
        Err(e) => {
            return CheckResult::fail("Cython", e.to_string()).with_duration(start.elapsed());
        }
    };

    let mut check = CheckResult::pass("Cython", format!("{} is available", program.display()))
        .with_path(path.clone());
    if let Some(version) = tool_version(&path, executor) {
        check = check.with_version(version);
    }
    check.with_duration(start.elapsed())
}

fn check_library<E>(program: &Path, library: &str, executor: &E) -> CheckResult
where
    E: ProcessExecutor + ?Sized,
{
    let start = Instant::now();
    let name = format!("library `{}`", library);

    let cmd = ProcessBuilder::new(program).args(["--modversion", library]);
    let result = match executor.exec(&cmd) {
        Ok(output) if output.success() => CheckResult::pass(name, "known to pkg-config")
            .with_version(output.stdout.trim().to_string()),
        Ok(_) | Err(_) => CheckResult::fail(
            name,
            "not found by pkg-config; its flags will be missing from the build",
        ),
    };

    result.optional().with_duration(start.elapsed())
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "extconf doctor").unwrap();
    writeln!(output, "==============\n").unwrap();

    if verbose {
        let get = |key: &str| {
            report
                .environment
                .get(key)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string())
        };
        writeln!(output, "Environment:").unwrap();
        writeln!(output, "  OS: {}", get("os")).unwrap();
        writeln!(
            output,
            "  Toggles: regenerate={} coverage={}",
            get("regenerate"),
            get("coverage")
        )
        .unwrap();
        writeln!(output).unwrap();
    }

    writeln!(output, "Checks:").unwrap();
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        writeln!(output, "  {} {}{}", status, check.name, required).unwrap();

        if verbose || !check.passed {
            writeln!(output, "      {}", check.message).unwrap();
        }
        if verbose {
            if let Some(path) = &check.path {
                writeln!(output, "      Path: {}", path.display()).unwrap();
            }
            if let Some(version) = &check.version {
                writeln!(output, "      Version: {}", version).unwrap();
            }
        }
    }

    writeln!(output).unwrap();

    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    writeln!(output, "Summary: {} passed, {} failed", passed, failed).unwrap();

    if required_failed > 0 {
        writeln!(
            output,
            "\nWarning: {} required check(s) failed. The build will not work.",
            required_failed
        )
        .unwrap();
    } else if failed > 0 {
        writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        )
        .unwrap();
    } else {
        writeln!(output, "\nAll checks passed.").unwrap();
    }

    output
}
