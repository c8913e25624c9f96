//! Variant execution: structured invocations, blocking runs, result
//! capture.
//!
//! The input reaches the program through the well-known input file staged
//! by the orchestrator, never through the argument list; every variant
//! writes its result to the well-known output file. The runner therefore
//! only needs to know the command string for each execution kind.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::catalog::{ExecKind, Variant};
use crate::config::HarnessConfig;
use crate::error::HarnessError;

/// Trailing debug/verbosity toggle every variant expects as its last
/// argument.
const DEBUG_FLAG: &str = "0";

/// A fully resolved command: program plus argument vector. Never a shell
/// string, so paths with spaces need no quoting and nothing can be
/// injected through a case or variant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    /// Build the invocation for one (kind, degree) run of an artifact.
    ///
    /// Sequential: `artifact 0`. Concurrent: `artifact <degree> 0`.
    /// Distributed: `<launcher> -n <degree> artifact 0`.
    pub fn for_run(kind: ExecKind, degree: u32, artifact: &Path, launcher: &str) -> Self {
        match kind {
            ExecKind::Sequential => Self {
                program: artifact.to_path_buf(),
                args: vec![DEBUG_FLAG.to_string()],
            },
            ExecKind::Concurrent => Self {
                program: artifact.to_path_buf(),
                args: vec![degree.to_string(), DEBUG_FLAG.to_string()],
            },
            ExecKind::Distributed => Self {
                program: PathBuf::from(launcher),
                args: vec![
                    "-n".to_string(),
                    degree.to_string(),
                    artifact.display().to_string(),
                    DEBUG_FLAG.to_string(),
                ],
            },
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of one (variant, degree) run.
///
/// On success `output` holds the trimmed contents of the well-known
/// output file; on failure it holds the trimmed combined stdout/stderr
/// capture, used only in the fatal error report.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Variant name.
    pub variant: String,
    pub degree: u32,
    pub succeeded: bool,
    /// Process exit status; 0 on success, -1 if killed by a signal.
    pub status: i32,
    pub output: String,
}

/// Executes variant artifacts one at a time in the configured working
/// directory.
pub struct Runner<'a> {
    config: &'a HarnessConfig,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a HarnessConfig) -> Self {
        Self { config }
    }

    /// Run `variant` at `degree` and collect its declared result.
    ///
    /// Blocks until the process exits. There is deliberately no timeout:
    /// a hung variant hangs the harness.
    pub fn execute(
        &self,
        variant: &Variant,
        artifact: &Path,
        degree: u32,
    ) -> Result<RunResult, HarnessError> {
        let invocation =
            Invocation::for_run(variant.kind, degree, artifact, &self.config.launcher);

        if self.config.verbosity >= 1 {
            println!("Running command: {}", invocation);
        }
        tracing::debug!(variant = %variant.name, degree, command = %invocation, "executing variant");

        let out = invocation
            .command()
            .current_dir(&self.config.work_dir)
            .output()?;

        let mut captured = String::from_utf8_lossy(&out.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&out.stderr));

        if self.config.verbosity >= 2 {
            print_indented(&captured);
        }
        if self.config.verbosity >= 1 {
            println!();
        }

        if !out.status.success() {
            return Ok(RunResult {
                variant: variant.name.clone(),
                degree,
                succeeded: false,
                status: out.status.code().unwrap_or(-1),
                output: captured.trim().to_string(),
            });
        }

        let payload = fs::read_to_string(self.config.output_path())?;
        Ok(RunResult {
            variant: variant.name.clone(),
            degree,
            succeeded: true,
            status: 0,
            output: payload.trim().to_string(),
        })
    }
}

/// Four-space indent for echoed program output, one line at a time.
pub(crate) fn print_indented(text: &str) {
    for line in text.lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_invocation() {
        let inv = Invocation::for_run(ExecKind::Sequential, 1, Path::new("/v/sum.exe"), "mpirun");
        assert_eq!(inv.program, PathBuf::from("/v/sum.exe"));
        assert_eq!(inv.args, vec!["0"]);
    }

    #[test]
    fn test_concurrent_invocation_leads_with_degree() {
        let inv = Invocation::for_run(ExecKind::Concurrent, 8, Path::new("/v/sum.exe"), "mpirun");
        assert_eq!(inv.program, PathBuf::from("/v/sum.exe"));
        assert_eq!(inv.args, vec!["8", "0"]);
    }

    #[test]
    fn test_distributed_invocation_wraps_launcher() {
        let inv = Invocation::for_run(ExecKind::Distributed, 4, Path::new("/v/sum.exe"), "mpirun");
        assert_eq!(inv.program, PathBuf::from("mpirun"));
        assert_eq!(inv.args, vec!["-n", "4", "/v/sum.exe", "0"]);
    }

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::for_run(ExecKind::Distributed, 2, Path::new("sum.exe"), "mpirun");
        assert_eq!(inv.to_string(), "mpirun -n 2 sum.exe 0");
    }

    #[test]
    #[cfg(unix)]
    fn test_execute_reads_trimmed_payload() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = HarnessConfig {
            work_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let variant = Variant {
            name: "echoer".to_string(),
            kind: ExecKind::Concurrent,
            precision: Default::default(),
        };

        // stand-in artifact: writes its result file and exits clean
        let script = dir.path().join("echoer.sh");
        fs::write(&script, "#!/bin/sh\necho '  8  ' > suman.out\n").unwrap();
        make_executable(&script);

        let runner = Runner::new(&config);
        let result = runner.execute(&variant, &script, 2).unwrap();

        assert!(result.succeeded);
        assert_eq!(result.status, 0);
        assert_eq!(result.output, "8");
        assert_eq!(result.degree, 2);
    }

    #[test]
    #[cfg(unix)]
    fn test_execute_reports_nonzero_exit() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = HarnessConfig {
            work_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let variant = Variant {
            name: "crasher".to_string(),
            kind: ExecKind::Sequential,
            precision: Default::default(),
        };

        let script = dir.path().join("crasher.sh");
        fs::write(&script, "#!/bin/sh\necho boom\nexit 3\n").unwrap();
        make_executable(&script);

        let runner = Runner::new(&config);
        let result = runner.execute(&variant, &script, 1).unwrap();

        assert!(!result.succeeded);
        assert_eq!(result.status, 3);
        assert_eq!(result.output, "boom");
    }

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
