//! Running child commands on behalf of pipeline steps.

use tracing::{debug, instrument};

use crate::application::{
    error::ProcessFailure,
    ports::{CommandInvocation, ProcessHost, ProgressReporter},
};

/// Captured output of a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes commands through a [`ProcessHost`] and applies exit-status and
/// verbosity policy.
pub struct ProcessRunner<'a> {
    host: &'a dyn ProcessHost,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> ProcessRunner<'a> {
    pub fn new(host: &'a dyn ProcessHost, reporter: &'a dyn ProgressReporter) -> Self {
        Self { host, reporter }
    }

    /// Run one command to completion.
    ///
    /// When `verbose`, non-empty stdout and stderr are surfaced through the
    /// reporter whatever the exit status. A non-zero exit becomes
    /// [`ProcessFailure::NonZeroExit`] carrying the captured stderr.
    #[instrument(skip_all, fields(command = %invocation.display(), cwd = %invocation.working_dir.display()))]
    pub fn execute(
        &self,
        invocation: &CommandInvocation,
        verbose: bool,
    ) -> Result<ProcessOutput, ProcessFailure> {
        let status = self.host.run(invocation)?;
        debug!(code = ?status.code, "command finished");

        if verbose {
            for stream in [&status.stdout, &status.stderr] {
                let text = stream.trim_end();
                if !text.is_empty() {
                    self.reporter.detail(text);
                }
            }
        }

        if !status.success() {
            return Err(ProcessFailure::NonZeroExit {
                command: invocation.display(),
                code: status.code,
                stderr: status.stderr,
            });
        }

        Ok(ProcessOutput {
            stdout: status.stdout,
            stderr: status.stderr,
        })
    }

    /// Run several commands in order, stopping at the first failure.
    pub fn execute_all(
        &self,
        invocations: &[CommandInvocation],
        verbose: bool,
    ) -> Result<(), ProcessFailure> {
        for invocation in invocations {
            self.execute(invocation, verbose)?;
        }
        Ok(())
    }
}
