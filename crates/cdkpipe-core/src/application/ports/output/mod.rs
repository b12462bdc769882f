//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `cdkpipe-adapters` crate provides the filesystem, process, template
//! and cloud implementations; the CLI provides the prompter and the
//! progress reporter.

use std::path::{Path, PathBuf};

use crate::application::error::{IoFailure, ProcessFailure};
use crate::domain::{AccountId, GitProtocol, ProjectAnswers, Region};
use crate::error::ScaffoldResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `cdkpipe_adapters::filesystem::LocalFilesystem` (production)
/// - `cdkpipe_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths are always absolute, resolved against the project root by the
/// caller.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a single directory. Fails if it already exists.
    fn create_dir(&self, path: &Path) -> Result<(), IoFailure>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, IoFailure>;

    /// Write content to a file, replacing it when present.
    fn write_file(&self, path: &Path, content: &str) -> Result<(), IoFailure>;

    /// Rename a file.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), IoFailure>;

    /// Delete a file.
    fn remove_file(&self, path: &Path) -> Result<(), IoFailure>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Port for child process execution.
///
/// Implemented by:
/// - `cdkpipe_adapters::process::SystemProcessHost` (production)
/// - `cdkpipe_adapters::process::ScriptedProcessHost` (testing)
///
/// A host reports a completed process as `Ok` whatever its exit code; only
/// failing to start, malformed input, or exceeding the bounded wait is an
/// `Err`. Turning a non-zero status into a failure is the runner's job.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessHost: Send + Sync {
    fn run(&self, invocation: &CommandInvocation) -> Result<ProcessStatus, ProcessFailure>;
}

/// Port for raw template contents.
///
/// Implemented by:
/// - `cdkpipe_adapters::template_library::EmbeddedTemplates` (compiled in)
/// - `cdkpipe_adapters::template_library::DirectoryTemplates` (on-disk override)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateLibrary: Send + Sync {
    /// Load a template by its library path, e.g. `lib/pipeline-stack.ts`.
    fn load(&self, name: &str) -> Result<String, IoFailure>;
}

/// Port for the cloud identity and repository service.
///
/// Implemented by `cdkpipe_adapters::aws::AwsCliProvider`.
#[cfg_attr(test, mockall::automock)]
pub trait CloudProvider: Send + Sync {
    /// Resolve the account a credential profile belongs to.
    fn account_id(&self, profile: &str) -> ScaffoldResult<AccountId>;

    /// Create the remote source repository.
    fn create_repository(&self, request: &RepositoryRequest) -> ScaffoldResult<()>;
}

/// Port for operator-facing progress.
///
/// Implemented by the CLI spinner; tests use a recording reporter.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressReporter: Send + Sync {
    /// A labelled unit of work has started.
    fn started(&self, label: &str);

    /// The unit of work completed.
    fn succeeded(&self, label: &str);

    /// The unit of work failed with the given message.
    fn failed(&self, label: &str, error: &str);

    /// Free-form output surfaced to the operator (child stdout/stderr).
    fn detail(&self, text: &str);
}

/// Port for collecting the answer set.
///
/// Implementations validate each field as it is entered, so a returned
/// [`ProjectAnswers`] is always well-formed.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    fn collect(&self, request: &PromptRequest) -> ScaffoldResult<ProjectAnswers>;
}

// ── Port payloads ────────────────────────────────────────────────────────────

/// How a command is handed to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// Program and arguments, passed to the OS as distinct strings.
    Argv(Vec<String>),
    /// A line interpreted by the platform shell.
    Shell(String),
}

/// A single child process request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: CommandSpec,
    pub working_dir: PathBuf,
    pub env: Vec<(String, String)>,
    pub capture_output: bool,
}

impl CommandInvocation {
    /// A literal argument vector.
    pub fn argv<I, S>(args: I, working_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_spec(
            CommandSpec::Argv(args.into_iter().map(Into::into).collect()),
            working_dir,
        )
    }

    /// A fixed command line, split into arguments with POSIX quoting rules.
    ///
    /// Only for lines that contain no user input.
    pub fn line(line: &str, working_dir: impl Into<PathBuf>) -> Result<Self, ProcessFailure> {
        let args = shell_words::split(line).map_err(|e| ProcessFailure::Malformed {
            command: line.to_string(),
            reason: e.to_string(),
        })?;
        if args.is_empty() {
            return Err(ProcessFailure::Malformed {
                command: line.to_string(),
                reason: "empty command".into(),
            });
        }
        Ok(Self::argv(args, working_dir))
    }

    /// A line run through the platform shell.
    pub fn shell(line: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self::with_spec(CommandSpec::Shell(line.into()), working_dir)
    }

    fn with_spec(command: CommandSpec, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            working_dir: working_dir.into(),
            env: Vec::new(),
            capture_output: true,
        }
    }

    /// Add an environment variable for the child.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Let the child write straight to the terminal instead of capturing.
    pub fn without_capture(mut self) -> Self {
        self.capture_output = false;
        self
    }

    pub fn uses_shell(&self) -> bool {
        matches!(self.command, CommandSpec::Shell(_))
    }

    /// Human-readable form, used in logs and error messages.
    pub fn display(&self) -> String {
        match &self.command {
            CommandSpec::Argv(args) => display_args(args),
            CommandSpec::Shell(line) => line.clone(),
        }
    }
}

/// Join arguments into a line an operator can paste into a shell.
///
/// Only arguments the shell would split or expand are quoted.
pub fn display_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            let plain = !arg.is_empty()
                && !arg.chars().any(|c| {
                    c.is_whitespace() || "'\"\\$`;&|<>()*?#~!{}[]".contains(c)
                });
            if plain {
                arg.into()
            } else {
                shell_words::quote(arg)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exit status and captured output of a completed child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStatus {
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessStatus {
    /// A zero exit with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Input to [`CloudProvider::create_repository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRequest {
    pub name: String,
    pub description: String,
    pub region: Region,
    pub profile: String,
}

/// Choices and defaults offered by the prompter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Credential profiles discovered on this machine. May be empty.
    pub profiles: Vec<String>,
    pub default_region: Region,
    pub default_protocol: GitProtocol,
    pub default_bootstrap: bool,
}

impl Default for PromptRequest {
    fn default() -> Self {
        Self {
            profiles: Vec::new(),
            default_region: Region::default(),
            default_protocol: GitProtocol::Https,
            default_bootstrap: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_splits_with_quoting() {
        let inv = CommandInvocation::line("git commit -m \"two words\"", "/p").unwrap();
        assert_eq!(
            inv.command,
            CommandSpec::Argv(vec![
                "git".into(),
                "commit".into(),
                "-m".into(),
                "two words".into()
            ])
        );
        assert_eq!(inv.working_dir, Path::new("/p"));
        assert!(!inv.uses_shell());
    }

    #[test]
    fn line_rejects_unbalanced_quotes_and_empty_input() {
        assert!(matches!(
            CommandInvocation::line("echo \"oops", "/p"),
            Err(ProcessFailure::Malformed { .. })
        ));
        assert!(matches!(
            CommandInvocation::line("   ", "/p"),
            Err(ProcessFailure::Malformed { .. })
        ));
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let inv = CommandInvocation::argv(["git", "commit", "-m", "a b"], "/p");
        assert_eq!(inv.display(), "git commit -m 'a b'");

        let shell = CommandInvocation::shell("git add . && true", "/p");
        assert!(shell.uses_shell());
        assert_eq!(shell.display(), "git add . && true");
    }

    #[test]
    fn display_leaves_urls_and_flags_unquoted() {
        let inv = CommandInvocation::argv(
            [
                "git",
                "remote",
                "add",
                "origin",
                "codecommit::eu-west-1://p@demo",
            ],
            "/p",
        );
        assert_eq!(
            inv.display(),
            "git remote add origin codecommit::eu-west-1://p@demo"
        );
        assert_eq!(
            display_args(&["npx", "cdk", "--require-approval=never", ""]),
            "npx cdk --require-approval=never ''"
        );
    }

    #[test]
    fn output_is_captured_unless_disabled() {
        let inv = CommandInvocation::argv(["npm", "install"], "/p");
        assert!(inv.capture_output);
        assert!(!inv.without_capture().capture_output);
    }

    #[test]
    fn env_is_appended_in_order() {
        let inv = CommandInvocation::argv(["npx"], "/p")
            .with_env("A", "1")
            .with_env("B", "2");
        assert_eq!(
            inv.env,
            vec![("A".to_string(), "1".to_string()), ("B".into(), "2".into())]
        );
    }
}
