//! Build step: turns catalog entries into runnable artifacts.
//!
//! The core only depends on the narrow [`Builder`] contract; the default
//! [`ToolchainBuilder`] compiles C++ sources with a plain compiler for
//! sequential/concurrent variants and the MPI wrapper for distributed
//! ones.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

use crate::catalog::{ExecKind, Variant, VariantCatalog};
use crate::config::{BuildConfig, HarnessConfig};
use crate::error::HarnessError;
use crate::runner::print_indented;

/// Anything that can produce a runnable artifact for a variant.
pub trait Builder {
    /// Build one variant, returning the artifact path. The path is
    /// deterministic for a given variant name.
    fn build(&self, variant: &Variant) -> Result<PathBuf, HarnessError>;

    /// Build every catalog entry up front. Any failure aborts before a
    /// single case runs.
    fn build_all(
        &self,
        catalog: &VariantCatalog,
    ) -> Result<HashMap<String, PathBuf>, HarnessError> {
        let mut artifacts = HashMap::new();
        for variant in catalog.iter() {
            let artifact = self.build(variant)?;
            artifacts.insert(variant.name.clone(), artifact);
        }
        Ok(artifacts)
    }
}

/// Compiles `<variants_dir>/<name>.cpp` into `<variants_dir>/<name>.exe`.
pub struct ToolchainBuilder {
    variants_dir: PathBuf,
    build: BuildConfig,
    verbosity: u8,
}

impl ToolchainBuilder {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            variants_dir: config.variants_dir.clone(),
            build: config.build.clone(),
            verbosity: config.verbosity,
        }
    }

    /// Deterministic artifact path for a variant name.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.variants_dir.join(format!("{}.exe", name))
    }

    fn source_path(&self, name: &str) -> PathBuf {
        self.variants_dir.join(format!("{}.cpp", name))
    }
}

impl Builder for ToolchainBuilder {
    fn build(&self, variant: &Variant) -> Result<PathBuf, HarnessError> {
        let source = self.source_path(&variant.name);
        let artifact = self.artifact_path(&variant.name);

        let compiler = match variant.kind {
            ExecKind::Distributed => &self.build.mpi_compiler,
            ExecKind::Sequential | ExecKind::Concurrent => &self.build.compiler,
        };

        let mut cmd = Command::new(compiler);
        cmd.args(&self.build.flags);
        if variant.kind == ExecKind::Concurrent {
            cmd.arg("-pthread");
        }
        cmd.arg(&source).arg("-o").arg(&artifact);
        cmd.args(&self.build.libs);

        if self.verbosity >= 1 {
            println!("Running command: {:?}", cmd);
        }
        tracing::debug!(variant = %variant.name, command = ?cmd, "compiling variant");

        let out = cmd.output()?;

        if self.verbosity >= 2 {
            print_indented(&String::from_utf8_lossy(&out.stdout));
        }
        if self.verbosity >= 1 {
            println!();
        }

        if !out.status.success() {
            // surface compiler diagnostics before aborting
            eprint!("{}", String::from_utf8_lossy(&out.stderr));
            return Err(HarnessError::BuildFailure {
                variant: variant.name.clone(),
                status: out.status.code().unwrap_or(-1),
            });
        }

        Ok(artifact)
    }
}
