//! Subprocess execution for CLI backends
//!
//! Processes are driven by the tokio runtime, so concurrent invocations
//! never block each other. A process that outlives its timeout is killed.

use council_application::GatewayError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` with `args` in `workdir`, bounded by `timeout`.
///
/// Spawn failures become [`GatewayError::CliFailed`], expiry becomes
/// [`GatewayError::Timeout`]. A non-zero exit is not an error here; the
/// caller decides what counts as usable output.
pub async fn run_command(
    program: &Path,
    args: &[String],
    workdir: &Path,
    timeout: Duration,
) -> Result<CliOutput, GatewayError> {
    let tool = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if workdir.is_dir() {
        command.current_dir(workdir);
    }

    let child = command.spawn().map_err(|e| GatewayError::CliFailed {
        tool: tool.clone(),
        reason: format!("failed to spawn: {}", e),
    })?;

    debug!("Spawned {} (pid {:?})", tool, child.id());

    // Dropping the future on timeout drops the child, which kills it
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| GatewayError::CliFailed {
            tool: tool.clone(),
            reason: e.to_string(),
        })?,
        Err(_) => return Err(GatewayError::Timeout(timeout.as_secs())),
    };

    Ok(CliOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sh() -> PathBuf {
        PathBuf::from("/bin/sh")
    }

    fn script(body: &str) -> Vec<String> {
        vec!["-c".to_string(), body.to_string()]
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let output = run_command(
            &sh(),
            &script("echo hello; echo oops >&2"),
            Path::new("."),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let output = run_command(&sh(), &script("exit 3"), Path::new("."), Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");

        let started = std::time::Instant::now();
        let err = run_command(
            &sh(),
            &script(&format!("sleep 2; touch '{}'", marker.display())),
            dir.path(),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();

        assert_eq!(err, GatewayError::Timeout(1));
        assert!(started.elapsed() < Duration::from_secs(2));

        // Had the shell survived, it would have written the marker by now
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = run_command(
            Path::new("/nonexistent/definitely-not-a-tool"),
            &[],
            Path::new("."),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GatewayError::CliFailed { .. }));
    }

    #[tokio::test]
    async fn test_runs_in_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_command(&sh(), &script("pwd"), dir.path(), Duration::from_secs(5))
            .await
            .unwrap();

        let reported = PathBuf::from(output.stdout.trim()).canonicalize().unwrap();
        assert_eq!(reported, dir.path().canonicalize().unwrap());
    }
}
