//! External process and full-screen image collaborators.
//!
//! Media playback and external apps run as detached child processes; the
//! interpreter only ever sees whether the spawn succeeded.

use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::{JukaError, Result};

/// Starts child processes on behalf of triggers and collapsed lists.
pub trait ProcessLauncher {
    /// Start `program` with `args` without waiting for it to finish.
    fn spawn(&self, program: &str, args: &[String]) -> Result<()>;

    /// Run `command` through the system shell and return its stdout.
    fn capture(&self, command: &str) -> Result<String>;
}

/// Shows a single image full screen for a fixed duration, blocking.
pub trait ImageViewer {
    fn show_image(&mut self, path: &str, duration: Duration) -> Result<()>;
}

/// [`ProcessLauncher`] backed by `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn spawn(&self, program: &str, args: &[String]) -> Result<()> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| JukaError::Process(format!("{program}: {e}")))?;
        log::info!("Started {program} (pid {})", child.id());

        let name = program.to_string();
        std::thread::Builder::new()
            .name("juka-reaper".into())
            .spawn(move || match child.wait() {
                Ok(status) if status.success() => log::debug!("{name} exited"),
                Ok(status) => log::warn!("{name} exited with {status}"),
                Err(e) => log::warn!("Failed to wait for {name}: {e}"),
            })
            .map_err(|e| JukaError::Process(format!("reaper thread: {e}")))?;
        Ok(())
    }

    fn capture(&self, command: &str) -> Result<String> {
        let output = shell(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| JukaError::Process(format!("{command}: {e}")))?;

        if !output.status.success() {
            return Err(JukaError::Process(format!(
                "command failed ({}): {command}",
                output.status
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| JukaError::Process(format!("{command}: non-UTF-8 output: {e}")))
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn capture_returns_stdout() {
        let out = SystemLauncher.capture("echo hello").unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn capture_failing_command_is_error() {
        let err = SystemLauncher.capture("exit 3").unwrap_err();
        assert!(matches!(err, JukaError::Process(_)));
    }

    #[test]
    fn spawn_missing_program_is_error() {
        let err = SystemLauncher
            .spawn("/nonexistent/juka-test-binary", &[])
            .unwrap_err();
        assert!(format!("{err}").contains("juka-test-binary"));
    }

    #[test]
    fn spawn_detaches() {
        SystemLauncher
            .spawn("true", &["ignored".to_string()])
            .unwrap();
    }
}
