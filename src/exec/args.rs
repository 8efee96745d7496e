// src/exec/args.rs

//! Command line handed to the PK-Sim CLI.

use std::path::Path;

use crate::types::{LogLevel, RunMode};

/// Subcommand selecting the qualification workflow of the CLI.
pub const QUALIFICATION_SUBCOMMAND: &str = "qualification";
pub const CONFIG_FILE_FLAG: &str = "-f";
pub const LOG_FILE_FLAG: &str = "-l";
pub const LOG_LEVEL_FLAG: &str = "--logLevel";
pub const VALIDATE_FLAG: &str = "-v";

/// Build the argument list in its fixed order:
///
/// `qualification -f <config> -l <log> --logLevel <level> [-v]`
///
/// Every token is a separate element; nothing is joined or passed through a
/// shell. `quote_paths` wraps paths containing whitespace in double quotes
/// for CLI builds whose parser expects quoted tokens.
pub fn build_arguments(
    config_file: &Path,
    log_file: &Path,
    log_level: LogLevel,
    mode: RunMode,
    quote_paths: bool,
) -> Vec<String> {
    let path_arg = |p: &Path| {
        let s = p.to_string_lossy().into_owned();
        if quote_paths { in_quotes(s) } else { s }
    };

    let mut args = vec![
        QUALIFICATION_SUBCOMMAND.to_string(),
        CONFIG_FILE_FLAG.to_string(),
        path_arg(config_file),
        LOG_FILE_FLAG.to_string(),
        path_arg(log_file),
        LOG_LEVEL_FLAG.to_string(),
        log_level.as_cli_token().to_string(),
    ];

    if mode == RunMode::Validate {
        args.push(VALIDATE_FLAG.to_string());
    }

    args
}

/// Wrap `s` in double quotes if it contains whitespace and is not quoted yet.
pub fn in_quotes(s: String) -> String {
    let already_quoted = s.len() >= 2 && s.starts_with('"') && s.ends_with('"');
    if s.contains(char::is_whitespace) && !already_quoted {
        format!("\"{s}\"")
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_mode_has_no_validate_flag() {
        let args = build_arguments(
            Path::new("/t/config.json"),
            Path::new("/t/log.txt"),
            LogLevel::Debug,
            RunMode::Run,
            false,
        );
        assert_eq!(
            args,
            vec![
                "qualification",
                "-f",
                "/t/config.json",
                "-l",
                "/t/log.txt",
                "--logLevel",
                "Debug"
            ]
        );
    }

    #[test]
    fn validate_mode_appends_flag_last() {
        let args = build_arguments(
            Path::new("c.json"),
            Path::new("l.txt"),
            LogLevel::Information,
            RunMode::Validate,
            false,
        );
        assert_eq!(args.last().map(String::as_str), Some("-v"));
        assert_eq!(args.len(), 8);
    }

    #[test]
    fn paths_with_spaces_stay_single_tokens() {
        let args = build_arguments(
            Path::new("/my temp/config.json"),
            Path::new("/my temp/log.txt"),
            LogLevel::Information,
            RunMode::Run,
            false,
        );
        assert_eq!(args[2], "/my temp/config.json");
        assert_eq!(args[4], "/my temp/log.txt");
    }

    #[test]
    fn quoting_only_touches_paths_with_whitespace() {
        let args = build_arguments(
            Path::new("/my temp/config.json"),
            Path::new("/plain/log.txt"),
            LogLevel::Information,
            RunMode::Run,
            true,
        );
        assert_eq!(args[2], "\"/my temp/config.json\"");
        assert_eq!(args[4], "/plain/log.txt");
    }

    #[test]
    fn in_quotes_does_not_double_quote() {
        assert_eq!(in_quotes("\"a b\"".to_string()), "\"a b\"");
        assert_eq!(in_quotes("a b".to_string()), "\"a b\"");
        assert_eq!(in_quotes("ab".to_string()), "ab");
    }
}
