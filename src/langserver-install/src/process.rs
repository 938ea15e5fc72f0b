//! External command execution.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Exit status of an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl ProcessStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ProcessStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs an external command and waits for it to exit.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> std::io::Result<ProcessStatus>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> std::io::Result<ProcessStatus> {
        tracing::debug!("Running: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(
                "{} exited with {:?}: {}",
                program,
                output.status.code(),
                stderr.trim()
            );
        }

        Ok(output.status.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_success() {
        assert!(ProcessStatus { code: Some(0) }.success());
        assert!(!ProcessStatus { code: Some(1) }.success());
        assert!(!ProcessStatus { code: None }.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_reports_exit_code_and_env() {
        let runner = TokioProcessRunner;
        let args = vec![
            "-c".to_string(),
            "test \"$LS_TEST\" = ok && exit 3".to_string(),
        ];
        let env = vec![("LS_TEST".to_string(), "ok".to_string())];

        let status = runner.run("sh", &args, &env).await.unwrap();
        assert_eq!(status.code, Some(3));
    }

    #[tokio::test]
    async fn test_runner_launch_failure() {
        let runner = TokioProcessRunner;
        let result = runner
            .run("langserver-test-no-such-program", &[], &[])
            .await;
        assert!(result.is_err());
    }
}
