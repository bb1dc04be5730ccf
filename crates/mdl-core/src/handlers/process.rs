//! Running an external tool to completion.

use std::process::{Command, Stdio};

/// Runs `command` and waits for it. On failure returns a one-line reason:
/// the last non-empty stderr line, or the exit status if stderr was empty.
pub(super) fn run_tool(mut command: Command, tool: &str) -> Result<(), String> {
    tracing::debug!(?command, "running {}", tool);
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("failed to execute {}: {}", tool, e))?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let last = stderr.lines().rev().map(str::trim).find(|l| !l.is_empty());
    Err(match last {
        Some(line) => format!("{} exited with {}: {}", tool, output.status, line),
        None => format!("{} exited with {}", tool, output.status),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn success() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("exit 0");
        assert!(run_tool(cmd, "sh").is_ok());
    }

    #[test]
    fn failure_reports_last_stderr_line() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo first >&2; echo 'real reason' >&2; echo >&2; exit 3");
        let err = run_tool(cmd, "sh").unwrap_err();
        assert!(err.ends_with("real reason"), "{err}");
        assert!(err.starts_with("sh exited with"), "{err}");
    }

    #[test]
    fn missing_binary() {
        let cmd = Command::new("/nonexistent/definitely-not-a-tool");
        let err = run_tool(cmd, "tool").unwrap_err();
        assert!(err.starts_with("failed to execute tool"), "{err}");
    }
}
