//! Runs the external autoscale script and hands back whatever it printed.

use crate::config::LauncherConfig;
use crate::error::LaunchError;
use crate::types::ScaleRequest;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// One shell command line, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command_line: String,
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn build(config: &LauncherConfig, deployment: &str, namespace: &str, cpu: f64) -> Self {
        let command_line = format!(
            "{} {} \"{}\" \"{}\" {:.6} 2>&1",
            config.interpreter,
            config.script.display(),
            escape_quoted(deployment),
            escape_quoted(namespace),
            cpu
        );
        Self {
            command_line,
            timeout: config.timeout,
        }
    }
}

/// Escape text for placement inside double quotes on the command line.
///
/// POSIX shells still expand `$`, backticks and backslashes within double
/// quotes, so those and `"` itself are backslash-escaped. `cmd.exe` has no
/// such escape and gets the text unchanged.
fn escape_quoted(text: &str) -> String {
    if cfg!(windows) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '$' | '`' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// The hook that actually starts a process.
pub trait ProcessRunner {
    /// Run to completion and return combined stdout/stderr. `Err` only when
    /// the process could not be started or the bounded wait expired.
    fn run(&self, invocation: &Invocation) -> impl Future<Output = std::io::Result<String>> + Send;
}

/// Executes through the platform command shell.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    pub shell: String,
    pub flag: String,
}

impl Default for ShellRunner {
    fn default() -> Self {
        if cfg!(windows) {
            Self {
                shell: "cmd.exe".to_string(),
                flag: "/c".to_string(),
            }
        } else {
            Self {
                shell: "sh".to_string(),
                flag: "-c".to_string(),
            }
        }
    }
}

impl ProcessRunner for ShellRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<String> {
        let child = Command::new(&self.shell)
            .arg(&self.flag)
            .arg(&invocation.command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        debug!("Spawned autoscaler (pid {:?})", child.id());

        let output = match invocation.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("no exit after {}s, process killed", limit.as_secs_f64()),
                    )
                })??,
            None => child.wait_with_output().await?,
        };

        debug!("Autoscaler exited with {}", output.status);
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

pub fn parse_cpu(input: &str) -> Result<f64, LaunchError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LaunchError::InvalidCpu {
            input: trimmed.to_string(),
        }),
    }
}

pub struct Launcher<R = ShellRunner> {
    config: LauncherConfig,
    runner: R,
}

impl Launcher<ShellRunner> {
    pub fn new(config: LauncherConfig) -> Self {
        Self::with_runner(config, ShellRunner::default())
    }
}

impl<R: ProcessRunner> Launcher<R> {
    pub fn with_runner(config: LauncherConfig, runner: R) -> Self {
        Self { config, runner }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Validate the CPU field, then run the script once and return its text.
    ///
    /// The only `Err` is [`LaunchError::InvalidCpu`], in which case nothing is
    /// started. Start failures come back as `Ok` text; the exit code is ignored.
    pub async fn autoscale(&self, request: &ScaleRequest) -> Result<String, LaunchError> {
        let cpu = parse_cpu(&request.cpu)?;
        let deployment = request.deployment.trim();
        let namespace = request.namespace.trim();
        Ok(self.run(deployment, namespace, cpu).await)
    }

    pub async fn run(&self, deployment: &str, namespace: &str, cpu: f64) -> String {
        let invocation = Invocation::build(&self.config, deployment, namespace, cpu);
        info!("Running autoscaler: {}", invocation.command_line);
        match self.runner.run(&invocation).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Autoscaler could not run: {}", e);
                LaunchError::Start(e.to_string()).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct SpyRunner {
        calls: Mutex<Vec<Invocation>>,
        reply: Option<String>,
    }

    impl ProcessRunner for SpyRunner {
        async fn run(&self, invocation: &Invocation) -> std::io::Result<String> {
            self.calls.lock().unwrap().push(invocation.clone());
            self.reply
                .clone()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "python: not found"))
        }
    }

    fn request(cpu: &str) -> ScaleRequest {
        ScaleRequest {
            deployment: "frontend".to_string(),
            namespace: "default".to_string(),
            cpu: cpu.to_string(),
        }
    }

    #[test]
    fn test_parse_cpu() {
        assert_eq!(parse_cpu(" 50.0 ").unwrap(), 50.0);
        assert_eq!(parse_cpu("75").unwrap(), 75.0);
        assert!(matches!(parse_cpu("abc"), Err(LaunchError::InvalidCpu { .. })));
        assert!(parse_cpu("").is_err());
        assert!(parse_cpu("NaN").is_err());
        assert!(parse_cpu("inf").is_err());
    }

    #[test]
    fn test_invocation_command_line() {
        let inv = Invocation::build(&LauncherConfig::default(), "frontend", "default", 50.0);
        assert_eq!(
            inv.command_line,
            "python aks_autoscaler.py \"frontend\" \"default\" 50.000000 2>&1"
        );
        assert_eq!(inv.timeout, None);
    }

    #[cfg(unix)]
    #[test]
    fn test_invocation_escapes_shell_metacharacters() {
        let inv = Invocation::build(&LauncherConfig::default(), "web$HOME", "a`id`\"b\\", 1.0);
        assert_eq!(
            inv.command_line,
            "python aks_autoscaler.py \"web\\$HOME\" \"a\\`id\\`\\\"b\\\\\" 1.000000 2>&1"
        );
    }

    #[tokio::test]
    async fn test_invalid_cpu_never_starts_process() {
        let launcher = Launcher::with_runner(LauncherConfig::default(), SpyRunner::default());
        let err = launcher.autoscale(&request("abc")).await.unwrap_err();
        assert!(matches!(err, LaunchError::InvalidCpu { ref input } if input == "abc"));
        assert!(launcher.runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_output_returned_verbatim() {
        let reply = "Scaled 'frontend' from 1 → 2 replicas\nwarning: mock mode\n".to_string();
        let spy = SpyRunner {
            reply: Some(reply.clone()),
            ..Default::default()
        };
        let launcher = Launcher::with_runner(LauncherConfig::default(), spy);

        let output = launcher.autoscale(&request("50.0")).await.unwrap();
        assert_eq!(output, reply);

        let calls = launcher.runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].command_line.contains("\"frontend\" \"default\" 50.000000"));
    }

    #[tokio::test]
    async fn test_start_failure_becomes_text() {
        let launcher = Launcher::with_runner(LauncherConfig::default(), SpyRunner::default());
        let output = launcher.autoscale(&request("50.0")).await.unwrap();
        assert!(output.starts_with("Error running autoscaler"));
        assert!(output.contains("python: not found"));
    }

    #[tokio::test]
    async fn test_missing_shell_becomes_text() {
        let runner = ShellRunner {
            shell: "/nonexistent/aks-console-shell".to_string(),
            flag: "-c".to_string(),
        };
        let launcher = Launcher::with_runner(LauncherConfig::default(), runner);
        let output = launcher.run("frontend", "default", 50.0).await;
        assert!(output.starts_with("Error running autoscaler"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_merges_streams_and_ignores_exit_code() {
        let config = LauncherConfig {
            interpreter: "echo".to_string(),
            script: "scale.py".into(),
            timeout: Some(Duration::from_secs(10)),
        };
        let launcher = Launcher::new(config);
        let output = launcher.run("frontend", "default", 50.0).await;
        assert_eq!(output, "scale.py frontend default 50.000000\n");

        let runner = ShellRunner::default();
        let inv = Invocation {
            command_line: "echo out; echo err >&2; exit 3".to_string(),
            timeout: None,
        };
        let output = runner.run(&inv).await.unwrap();
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_passes_fields_literally() {
        let config = LauncherConfig {
            interpreter: "printf '%s\\n'".to_string(),
            script: "scale.py".into(),
            timeout: Some(Duration::from_secs(10)),
        };
        let launcher = Launcher::new(config);
        let output = launcher.run("web$HOME", "ns`echo x`\"q\\", 5.0).await;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, ["scale.py", "web$HOME", "ns`echo x`\"q\\", "5.000000"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_bounded_wait() {
        let runner = ShellRunner::default();
        let inv = Invocation {
            command_line: "sleep 5".to_string(),
            timeout: Some(Duration::from_millis(100)),
        };
        let err = runner.run(&inv).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
    }
}
