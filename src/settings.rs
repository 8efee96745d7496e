// src/settings.rs

//! Where to find the PK-Sim CLI.
//!
//! Resolution order for the PK-Sim installation folder:
//! 1. a value set explicitly by the host
//! 2. `QUALIFICATION_RUNNER_PKSIM_DIR` environment variable
//! 3. `pksim_install_folder` in a TOML settings file
//!
//! ```toml
//! pksim_install_folder = "C:/Program Files/Open Systems Pharmacology/PK-Sim 11"
//! # optional, defaults to PKSim.CLI.exe on Windows and PKSim.CLI elsewhere
//! cli_executable_name = "PKSim.CLI.exe"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::errors::{QualificationError, Result};

pub const PKSIM_DIR_ENV_VAR: &str = "QUALIFICATION_RUNNER_PKSIM_DIR";

#[cfg(windows)]
pub const DEFAULT_CLI_EXECUTABLE: &str = "PKSim.CLI.exe";
#[cfg(not(windows))]
pub const DEFAULT_CLI_EXECUTABLE: &str = "PKSim.CLI";

/// Runner settings as read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RunnerSettings {
    /// Installation folder of PK-Sim, containing the CLI executable.
    #[serde(default)]
    pub pksim_install_folder: Option<PathBuf>,

    /// File name of the CLI inside the installation folder.
    #[serde(default)]
    pub cli_executable_name: Option<String>,
}

impl RunnerSettings {
    pub fn with_install_folder(folder: impl Into<PathBuf>) -> Self {
        Self {
            pksim_install_folder: Some(folder.into()),
            cli_executable_name: None,
        }
    }

    /// Load settings from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let settings: RunnerSettings = toml::from_str(&contents)?;
        Ok(settings)
    }

    /// Settings taken from the environment only.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(PKSIM_DIR_ENV_VAR).map(PathBuf::from))
    }

    fn from_env_value(value: Option<PathBuf>) -> Self {
        Self {
            pksim_install_folder: value.filter(|p| !p.as_os_str().is_empty()),
            cli_executable_name: None,
        }
    }

    /// Overlay: fields set in `self` win over those in `fallback`.
    pub fn or(self, fallback: RunnerSettings) -> Self {
        Self {
            pksim_install_folder: self.pksim_install_folder.or(fallback.pksim_install_folder),
            cli_executable_name: self.cli_executable_name.or(fallback.cli_executable_name),
        }
    }

    /// Full resolution chain: `explicit` > environment > `settings_file`.
    pub fn resolve(explicit: RunnerSettings, settings_file: Option<&Path>) -> Result<Self> {
        let from_file = match settings_file {
            Some(path) => Self::load_from_path(path)?,
            None => RunnerSettings::default(),
        };
        Ok(explicit.or(Self::from_env()).or(from_file))
    }

    pub fn cli_executable_name(&self) -> &str {
        self.cli_executable_name
            .as_deref()
            .unwrap_or(DEFAULT_CLI_EXECUTABLE)
    }
}

/// Locates the PK-Sim CLI executable.
pub trait CliLocator: Send + Sync {
    fn cli_path(&self) -> Result<PathBuf>;
}

/// `<install folder>/<cli executable>` from [`RunnerSettings`].
#[derive(Debug, Clone)]
pub struct InstallFolderLocator {
    settings: RunnerSettings,
}

impl InstallFolderLocator {
    pub fn new(settings: RunnerSettings) -> Self {
        Self { settings }
    }
}

impl CliLocator for InstallFolderLocator {
    fn cli_path(&self) -> Result<PathBuf> {
        let folder = self.settings.pksim_install_folder.as_ref().ok_or_else(|| {
            QualificationError::Settings(format!(
                "PK-Sim installation folder is not configured (set {PKSIM_DIR_ENV_VAR} or pksim_install_folder)"
            ))
        })?;

        let path = folder.join(self.settings.cli_executable_name());
        debug!(path = ?path, "resolved PK-Sim CLI path");
        Ok(path)
    }
}

/// A fixed executable path, for hosts that already know where the CLI is.
#[derive(Debug, Clone)]
pub struct FixedCliPath(pub PathBuf);

impl CliLocator for FixedCliPath {
    fn cli_path(&self) -> Result<PathBuf> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn explicit_settings_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
pksim_install_folder = "/from/file"
cli_executable_name = "custom-cli"
"#
        )
        .unwrap();

        let explicit = RunnerSettings::with_install_folder("/explicit");
        let resolved = explicit
            .or(RunnerSettings::from_env_value(None))
            .or(RunnerSettings::load_from_path(file.path()).unwrap());

        assert_eq!(resolved.pksim_install_folder, Some(PathBuf::from("/explicit")));
        assert_eq!(resolved.cli_executable_name(), "custom-cli");
    }

    #[test]
    fn env_value_wins_over_file_and_empty_is_ignored() {
        let file = RunnerSettings::with_install_folder("/from/file");

        let env = RunnerSettings::from_env_value(Some(PathBuf::from("/from/env")));
        let resolved = RunnerSettings::default().or(env).or(file.clone());
        assert_eq!(resolved.pksim_install_folder, Some(PathBuf::from("/from/env")));

        let empty = RunnerSettings::from_env_value(Some(PathBuf::new()));
        let resolved = RunnerSettings::default().or(empty).or(file);
        assert_eq!(resolved.pksim_install_folder, Some(PathBuf::from("/from/file")));
    }

    #[test]
    fn locator_joins_folder_and_default_executable() {
        let locator = InstallFolderLocator::new(RunnerSettings::with_install_folder("/opt/pksim"));
        assert_eq!(
            locator.cli_path().unwrap(),
            PathBuf::from("/opt/pksim").join(DEFAULT_CLI_EXECUTABLE)
        );
    }

    #[test]
    fn locator_without_folder_is_a_settings_error() {
        let locator = InstallFolderLocator::new(RunnerSettings::default());
        let err = locator.cli_path().unwrap_err();
        assert!(matches!(err, QualificationError::Settings(msg) if msg.contains(PKSIM_DIR_ENV_VAR)));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "pksim_install_folder = [").unwrap();
        let err = RunnerSettings::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, QualificationError::TomlError(_)));
    }
}
