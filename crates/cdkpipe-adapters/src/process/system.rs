//! Child process execution with `std::process`.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use cdkpipe_core::application::{
    ProcessFailure,
    ports::{CommandInvocation, CommandSpec, ProcessHost, ProcessStatus},
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs commands on the local machine.
///
/// Argument vectors are handed to the OS as-is; shell lines go through
/// `sh -c` (`cmd /C` on Windows). Stdin is closed so tools that would
/// otherwise prompt fall back to their non-interactive defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessHost {
    timeout: Option<Duration>,
}

impl SystemProcessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill children that run longer than `timeout`. `None` waits forever.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn command(&self, invocation: &CommandInvocation) -> Result<Command, ProcessFailure> {
        let mut cmd = match &invocation.command {
            CommandSpec::Argv(args) => {
                let (program, rest) =
                    args.split_first().ok_or_else(|| ProcessFailure::Malformed {
                        command: String::new(),
                        reason: "empty argument vector".into(),
                    })?;
                let mut cmd = Command::new(program);
                cmd.args(rest);
                cmd
            }
            CommandSpec::Shell(line) => {
                let (shell, flag) = platform_shell();
                let mut cmd = Command::new(shell);
                cmd.arg(flag).arg(line);
                cmd
            }
        };

        cmd.current_dir(&invocation.working_dir);
        cmd.envs(invocation.env.iter().map(|(k, v)| (k, v)));
        cmd.stdin(Stdio::null());
        // With a bounded wait the child leads its own group, so a timeout
        // can take down everything it started (npx -> node).
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            if self.timeout.is_some() {
                cmd.process_group(0);
            }
        }
        if invocation.capture_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
        Ok(cmd)
    }

    fn wait(
        &self,
        child: &mut Child,
        command: &str,
    ) -> Result<Option<i32>, ProcessFailure> {
        let waited = |e: std::io::Error| ProcessFailure::Spawn {
            command: command.to_string(),
            reason: format!("failed waiting for child: {e}"),
        };

        let Some(limit) = self.timeout else {
            return child.wait().map(|s| s.code()).map_err(waited);
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(waited)? {
                return Ok(status.code());
            }
            if started.elapsed() >= limit {
                warn!(command, seconds = limit.as_secs(), "killing child after timeout");
                kill_tree(child);
                let _ = child.wait();
                return Err(ProcessFailure::TimedOut {
                    command: command.to_string(),
                    seconds: limit.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl ProcessHost for SystemProcessHost {
    #[instrument(skip_all, fields(command = %invocation.display()))]
    fn run(&self, invocation: &CommandInvocation) -> Result<ProcessStatus, ProcessFailure> {
        let display = invocation.display();
        let mut child = self
            .command(invocation)?
            .spawn()
            .map_err(|e| ProcessFailure::Spawn {
                command: display.clone(),
                reason: e.to_string(),
            })?;

        // Drain both pipes concurrently so a chatty child cannot block on a
        // full pipe while we wait on it.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let code = self.wait(&mut child, &display)?;
        let status = ProcessStatus {
            code,
            stdout: collect(stdout),
            stderr: collect(stderr),
        };
        debug!(code = ?status.code, "child exited");
        Ok(status)
    }
}

/// Kill the child and, on Unix, the process group it leads.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: `kill` touches no memory; a stale group id yields ESRCH.
            if unsafe { libc::kill(-pgid, libc::SIGKILL) } == 0 {
                return;
            }
        }
    }
    // The child may have exited between try_wait and kill.
    let _ = child.kill();
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn platform_shell() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}
