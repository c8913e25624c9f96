//! TOML configuration for the harness.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::Variant;
use crate::error::HarnessError;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "concord.toml";

/// Build-step settings for [`crate::build::ToolchainBuilder`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Compiler for sequential and concurrent variants.
    pub compiler: String,
    /// Compiler wrapper for distributed variants.
    pub mpi_compiler: String,
    pub flags: Vec<String>,
    /// Trailing link arguments.
    pub libs: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            mpi_compiler: "mpicxx".to_string(),
            flags: vec!["-std=c++11".to_string()],
            libs: vec!["-lgmpxx".to_string(), "-lgmp".to_string()],
        }
    }
}

/// Harness configuration loaded from a TOML file, with CLI overrides
/// applied on top. There is no ambient global state: the config value is
/// threaded explicitly through builder, runner and orchestrator
/// construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory of case files; each file name is the case identity.
    pub cases_dir: PathBuf,
    /// Directory holding variant sources and built artifacts.
    pub variants_dir: PathBuf,
    /// Working directory runs execute in; the side-channel files live here.
    pub work_dir: PathBuf,
    /// Well-known input file every variant reads, relative to `work_dir`.
    pub input_file: String,
    /// Well-known output file every variant writes, relative to `work_dir`.
    pub output_file: String,
    /// Name substring marking extended-precision cases.
    pub extended_marker: String,
    /// Independent repetitions per case, to surface intermittent races.
    pub repetitions: u32,
    /// Distributed-process launcher program.
    pub launcher: String,
    pub build: BuildConfig,
    /// Declared catalog; empty means the built-in default table.
    pub variants: Vec<Variant>,
    /// Set from the CLI, never from the file. 1 echoes commands, 2 also
    /// echoes captured output.
    #[serde(skip)]
    pub verbosity: u8,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            cases_dir: PathBuf::from("cases"),
            variants_dir: PathBuf::from("variants"),
            work_dir: PathBuf::from("."),
            input_file: "suman.in".to_string(),
            output_file: "suman.out".to_string(),
            extended_marker: "bigNumber".to_string(),
            repetitions: 4,
            launcher: "mpirun".to_string(),
            build: BuildConfig::default(),
            variants: Vec::new(),
            verbosity: 0,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("failed to read config '{}': {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            HarnessError::Config(format!("failed to parse config '{}': {}", path.display(), e))
        })
    }

    /// Load from an explicit path (errors are fatal), or from the default
    /// location if it exists, or fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, HarnessError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn input_path(&self) -> PathBuf {
        self.work_dir.join(&self.input_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.work_dir.join(&self.output_file)
    }
}
