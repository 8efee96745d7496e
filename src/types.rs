// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Log level forwarded to the PK-Sim CLI through `--logLevel`.
///
/// The CLI parses the .NET level names, so `Display` renders exactly those
/// tokens (`Information`, not `Info`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Information,
    Warning,
    Error,
    Critical,
    None,
}

impl LogLevel {
    pub fn as_cli_token(self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
            LogLevel::None => "None",
        }
    }

    /// Closest `tracing` level, or `None` when logging is switched off.
    pub fn as_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Trace => Some(tracing::Level::TRACE),
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Information => Some(tracing::Level::INFO),
            LogLevel::Warning => Some(tracing::Level::WARN),
            LogLevel::Error | LogLevel::Critical => Some(tracing::Level::ERROR),
            LogLevel::None => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cli_token())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" | "information" => Ok(LogLevel::Information),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            "none" | "off" => Ok(LogLevel::None),
            other => Err(format!(
                "invalid log level: {other} (expected trace, debug, information, warning, error, critical or none)"
            )),
        }
    }
}

/// Whether the CLI should perform the qualification or only validate it.
///
/// Both modes go through the same engine; `Validate` only adds the `-v` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Run,
    Validate,
}

/// Raw exit code reported by the PK-Sim CLI.
///
/// Only `0` means success. Other values are owned by the CLI and kept opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Code used when the OS reports no exit code (killed by a signal).
    pub const TERMINATED: ExitCode = ExitCode(-1);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn from_status(status: std::process::ExitStatus) -> Self {
        status.code().map(ExitCode).unwrap_or(Self::TERMINATED)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_zero_is_success() {
        assert!(ExitCode(0).is_success());
        for code in [1, -1, 255, 2, i32::MIN] {
            assert!(!ExitCode(code).is_success(), "{code} must be a failure");
        }
    }

    #[test]
    fn log_level_renders_cli_tokens() {
        assert_eq!(LogLevel::Information.to_string(), "Information");
        assert_eq!(LogLevel::Warning.to_string(), "Warning");
        assert_eq!(LogLevel::default(), LogLevel::Information);
    }

    #[test]
    fn log_level_parses_short_and_long_names() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Information);
        assert_eq!(" WARN ".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("off".parse::<LogLevel>().unwrap(), LogLevel::None);
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
