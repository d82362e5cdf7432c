//! Execution of skill commands.
//!
//! Every outcome is a returned string: captured output, launch failures,
//! abnormal exits, and timeouts are all folded into the result text, so a
//! broken skill can never take down the serving process.

use crate::types::ARG_ENV_PREFIX;
use serde_json::Value;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result text returned when a command produces no output at all.
pub const NO_OUTPUT: &str = "Success (no output)";

/// Prefix of results describing a failed launch, abnormal exit, or timeout.
pub const EXECUTION_FAILED: &str = "Execution failed: ";

/// Runs skill commands inside their skill directory, with call arguments
/// bound to `SKILL_ARG_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    timeout: Option<Duration>,
}

impl Executor {
    /// Executor that waits for commands indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that kills commands still running after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `command` with `skill_dir` as working directory and `args` bound
    /// to prefixed environment variables.
    ///
    /// A command naming a script file inside the skill directory is run
    /// through its interpreter; anything else is handed to the platform
    /// shell. The extended environment is inherited from the current process,
    /// never replaced. Output priority: stderr with no stdout is returned as
    /// an error string, then non-empty stdout, then a fixed no-output
    /// sentinel.
    pub fn run(&self, skill_dir: &Path, command: &str, args: &serde_json::Map<String, Value>) -> String {
        debug!(command, dir = %skill_dir.display(), "running skill command");

        let mut cmd = build_command(skill_dir, command);
        cmd.current_dir(skill_dir).stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        for (key, value) in args {
            cmd.env(arg_env_name(key), stringify(value));
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => return format!("{EXECUTION_FAILED}{err}"),
        };

        if let Some(timeout) = self.timeout
            && let Err(message) = wait_with_deadline(&mut child, command, timeout)
        {
            return message;
        }

        let output = match child.wait_with_output() {
            Ok(output) => output,
            Err(err) => return format!("{EXECUTION_FAILED}{err}"),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let mut message = format!("{EXECUTION_FAILED}command exited with {}", output.status);
            let detail = stderr.trim();
            if !detail.is_empty() {
                message.push_str(": ");
                message.push_str(detail);
            }
            return message;
        }

        if !stderr.is_empty() && stdout.is_empty() {
            return format!("Error: {stderr}");
        }

        if !stdout.is_empty() { stdout } else { NO_OUTPUT.to_string() }
    }
}

/// Poll the child until it exits or the deadline passes, killing it on
/// expiry. The pipes are not drained while polling, so a command that fills
/// them only completes via the deadline.
fn wait_with_deadline(child: &mut Child, command: &str, timeout: Duration) -> Result<(), String> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return Ok(()),
            Ok(None) => {
                if Instant::now() >= deadline {
                    warn!(command, timeout_secs = timeout.as_secs(), "skill command exceeded deadline, killing");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(format!(
                        "{EXECUTION_FAILED}command timed out after {:.1}s",
                        timeout.as_secs_f64()
                    ));
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            Err(err) => {
                let _ = child.kill();
                return Err(format!("{EXECUTION_FAILED}{err}"));
            }
        }
    }
}

/// Scripts listed by bare file name run from the skill directory even though
/// it is not on PATH; everything else goes through the shell.
fn build_command(skill_dir: &Path, command: &str) -> Command {
    if skill_dir.join(command).is_file()
        && let Some(interpreter) = interpreter_for(command)
    {
        let mut cmd = Command::new(interpreter);
        cmd.arg(command);
        return cmd;
    }

    shell_command(command)
}

/// Interpreter for a script file, matched by extension.
fn interpreter_for(command: &str) -> Option<&'static str> {
    let extension = Path::new(command).extension()?.to_str()?;
    match extension.to_lowercase().as_str() {
        "sh" => Some("sh"),
        "py" => Some("python3"),
        "js" => Some("node"),
        _ => None,
    }
}

fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// `who` becomes `SKILL_ARG_WHO`.
fn arg_env_name(key: &str) -> String {
    format!("{ARG_ENV_PREFIX}{}", key.to_uppercase())
}

/// JSON strings are passed verbatim; other values use their JSON rendering.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
