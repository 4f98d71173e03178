//! Infrastructure adapter that runs the loader command through `/bin/sh`.

use crate::domain::errors::{LoaderError, Result};
use crate::ports::{ProcessOutput, ProcessPort};
use log::{debug, warn};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Concrete `ProcessPort` using a blocking shell invocation.
///
/// Stdout and stderr are drained on background threads while the child is
/// polled, so large loader output cannot fill the pipe buffers and stall
/// the run. On timeout the child is killed and the run reports as
/// unsuccessful with a `None` exit code.
#[derive(Debug, Default)]
pub struct ShellAdapter;

impl ShellAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn drain(stream: Option<impl Read + Send + 'static>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_string(&mut buf);
        }
        buf
    })
}

fn collect(handle: JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

impl ProcessPort for ShellAdapter {
    fn run(&self, command: &str, timeout: Duration) -> Result<ProcessOutput> {
        debug!("Spawning: {}", command);

        let mut child: Child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LoaderError::Process(format!("failed to spawn `{command}`: {e}")))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        loop {
            match child.try_wait()? {
                Some(status) => {
                    return Ok(ProcessOutput {
                        exit_code: status.code(),
                        stdout: collect(stdout),
                        stderr: collect(stderr),
                    });
                }
                None if started.elapsed() >= timeout => {
                    warn!(
                        "Command timed out after {}s, killing process",
                        timeout.as_secs()
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    let mut stderr = collect(stderr);
                    stderr.push_str(&format!(
                        "\nprocess timed out after {} seconds",
                        timeout.as_secs()
                    ));
                    return Ok(ProcessOutput {
                        exit_code: None,
                        stdout: collect(stdout),
                        stderr,
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_code() {
        let out = ShellAdapter::new()
            .run("echo loaded", Duration::from_secs(5))
            .unwrap();
        assert!(out.successful());
        assert_eq!(out.stdout.trim(), "loaded");
    }

    #[test]
    fn nonzero_exit_is_captured_not_raised() {
        let out = ShellAdapter::new()
            .run("echo oops >&2; exit 3", Duration::from_secs(5))
            .unwrap();
        assert!(out.failed());
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    fn timeout_kills_and_reports_failure() {
        let started = Instant::now();
        let out = ShellAdapter::new()
            .run("sleep 30", Duration::from_millis(200))
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(out.failed());
        assert_eq!(out.exit_code, None);
        assert!(out.stderr.contains("timed out"));
    }

    #[test]
    fn missing_binary_fails_via_shell_exit_code() {
        // `sh -c` itself spawns fine; the failure shows up as exit 127.
        let out = ShellAdapter::new()
            .run("definitely-not-a-real-binary-xyz", Duration::from_secs(5))
            .unwrap();
        assert_eq!(out.exit_code, Some(127));
    }
}
