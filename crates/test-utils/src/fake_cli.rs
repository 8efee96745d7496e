//! Shell-script stand-ins for the PK-Sim CLI (unix only).
//!
//! The script receives the real command line
//! (`qualification -f <config> -l <log> --logLevel <level> [-v]`), records
//! its pid and arguments, writes to the log file and then either exits with
//! a fixed code or blocks until killed.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct FakeCli {
    pub program: PathBuf,
    pub pid_file: PathBuf,
    pub args_file: PathBuf,
}

impl FakeCli {
    /// A CLI that logs two lines and exits with `code`.
    pub fn exiting(dir: &Path, code: i32) -> Self {
        Self::write(
            dir,
            &format!(
                "echo \"qualification started\" >> \"$5\"\n\
                 echo \"qualification finished with {code}\" >> \"$5\"\n\
                 exit {code}\n"
            ),
        )
    }

    /// A CLI that logs one line and then sleeps until killed.
    pub fn hanging(dir: &Path) -> Self {
        Self::write(
            dir,
            "echo \"qualification started\" >> \"$5\"\nexec sleep 30\n",
        )
    }

    fn write(dir: &Path, body: &str) -> Self {
        let program = dir.join("fake-pksim-cli");
        let pid_file = dir.join("fake-pksim-cli.pid");
        let args_file = dir.join("fake-pksim-cli.args");

        let script = format!(
            "#!/bin/sh\n\
             echo $$ > \"{pid}\"\n\
             for a in \"$@\"; do echo \"$a\"; done > \"{args}\"\n\
             {body}",
            pid = pid_file.display(),
            args = args_file.display(),
        );
        fs::write(&program, script).expect("writing fake CLI script");
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755))
            .expect("making fake CLI executable");

        Self {
            program,
            pid_file,
            args_file,
        }
    }

    /// Pid recorded by the script, once it has started.
    pub fn pid(&self) -> Option<u32> {
        fs::read_to_string(&self.pid_file)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }

    /// Arguments exactly as the script received them, one per element.
    pub fn received_args(&self) -> Vec<String> {
        fs::read_to_string(&self.args_file)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// True if a process with `pid` exists (zombies included).
pub fn process_alive(pid: u32) -> bool {
    Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
