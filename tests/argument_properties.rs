// tests/argument_properties.rs

use std::path::PathBuf;

use proptest::prelude::*;
use qualification_runner::exec::args::{
    CONFIG_FILE_FLAG, LOG_FILE_FLAG, LOG_LEVEL_FLAG, QUALIFICATION_SUBCOMMAND, VALIDATE_FLAG,
};
use qualification_runner::exec::build_arguments;
use qualification_runner::{LogLevel, RunMode};

fn log_level_strategy() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Information),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Critical),
        Just(LogLevel::None),
    ]
}

fn mode_strategy() -> impl Strategy<Value = RunMode> {
    prop_oneof![Just(RunMode::Run), Just(RunMode::Validate)]
}

// Folder names with spaces, dashes and dots, but never a bare flag token.
fn folder_strategy() -> impl Strategy<Value = PathBuf> {
    proptest::collection::vec("[a-zA-Z0-9 ._]{1,12}", 1..4)
        .prop_map(|parts| parts.iter().fold(PathBuf::from("/runs"), |p, s| p.join(s)))
}

fn position(args: &[String], token: &str) -> Option<usize> {
    args.iter().position(|a| a == token)
}

proptest! {
    #[test]
    fn flags_keep_their_relative_order(
        folder in folder_strategy(),
        level in log_level_strategy(),
        mode in mode_strategy(),
        quote in any::<bool>(),
    ) {
        let args = build_arguments(
            &folder.join("config.json"),
            &folder.join("log.txt"),
            level,
            mode,
            quote,
        );

        prop_assert_eq!(args[0].as_str(), QUALIFICATION_SUBCOMMAND);

        let f = position(&args, CONFIG_FILE_FLAG).expect("-f present");
        let l = position(&args, LOG_FILE_FLAG).expect("-l present");
        let lvl = position(&args, LOG_LEVEL_FLAG).expect("--logLevel present");
        prop_assert!(f < l && l < lvl);
        prop_assert_eq!(args[lvl + 1].as_str(), level.as_cli_token());

        let has_validate = args.iter().any(|a| a == VALIDATE_FLAG);
        prop_assert_eq!(has_validate, mode == RunMode::Validate);
        prop_assert_eq!(args.len(), if has_validate { 8 } else { 7 });
    }

    #[test]
    fn unquoted_paths_are_passed_verbatim(folder in folder_strategy()) {
        let config = folder.join("config.json");
        let log = folder.join("log.txt");
        let args = build_arguments(&config, &log, LogLevel::Information, RunMode::Run, false);

        prop_assert_eq!(PathBuf::from(&args[2]), config);
        prop_assert_eq!(PathBuf::from(&args[4]), log);
    }
}
