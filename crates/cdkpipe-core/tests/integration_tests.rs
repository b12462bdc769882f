//! Integration tests for cdkpipe-core through its public API.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cdkpipe_core::prelude::*;

// ── Fakes ────────────────────────────────────────────────────────────────────

struct FixedPrompter(ProjectAnswers);

impl Prompter for FixedPrompter {
    fn collect(&self, _request: &PromptRequest) -> ScaffoldResult<ProjectAnswers> {
        Ok(self.0.clone())
    }
}

/// Reports a fixed set of existing paths and accepts every write.
struct ExistingPaths(Vec<PathBuf>);

impl Filesystem for ExistingPaths {
    fn create_dir(&self, _path: &Path) -> Result<(), IoFailure> {
        Ok(())
    }
    fn read_to_string(&self, path: &Path) -> Result<String, IoFailure> {
        Err(IoFailure::ReadFailed {
            path: path.to_path_buf(),
            reason: "not found".into(),
        })
    }
    fn write_file(&self, _path: &Path, _content: &str) -> Result<(), IoFailure> {
        Ok(())
    }
    fn rename(&self, _from: &Path, _to: &Path) -> Result<(), IoFailure> {
        Ok(())
    }
    fn remove_file(&self, _path: &Path) -> Result<(), IoFailure> {
        Ok(())
    }
    fn exists(&self, path: &Path) -> bool {
        self.0.iter().any(|p| p == path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.exists(path)
    }
}

struct SilentHost;

impl ProcessHost for SilentHost {
    fn run(&self, _invocation: &CommandInvocation) -> Result<ProcessStatus, ProcessFailure> {
        Ok(ProcessStatus::ok(""))
    }
}

struct NoTemplates;

impl TemplateLibrary for NoTemplates {
    fn load(&self, name: &str) -> Result<String, IoFailure> {
        Err(IoFailure::TemplateUnreadable {
            template: name.into(),
            reason: "none".into(),
        })
    }
}

/// Counts identity lookups; `None` account makes them fail.
struct CountingCloud {
    account: Option<&'static str>,
    lookups: Arc<AtomicUsize>,
}

impl CloudProvider for CountingCloud {
    fn account_id(&self, profile: &str) -> ScaffoldResult<AccountId> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.account {
            Some(account) => Ok(AccountId::new(account)?),
            None => Err(ApplicationError::Identity {
                profile: profile.into(),
                reason: "expired token".into(),
            }
            .into()),
        }
    }

    fn create_repository(&self, _request: &RepositoryRequest) -> ScaffoldResult<()> {
        Ok(())
    }
}

struct Quiet;

impl ProgressReporter for Quiet {
    fn started(&self, _label: &str) {}
    fn succeeded(&self, _label: &str) {}
    fn failed(&self, _label: &str, _error: &str) {}
    fn detail(&self, _text: &str) {}
}

fn answers(protocol: GitProtocol) -> ProjectAnswers {
    ProjectAnswers {
        project_name: ProjectName::parse("demo-app").unwrap(),
        project_description: "Demo pipeline".into(),
        profile_name: "sandbox".into(),
        region: Region::EuWest1,
        git_protocol: protocol,
        bootstrap_required: false,
    }
}

fn service(
    existing: Vec<PathBuf>,
    account: Option<&'static str>,
) -> (ScaffoldService, Arc<AtomicUsize>) {
    let lookups = Arc::new(AtomicUsize::new(0));
    let service = ScaffoldService::new(
        Box::new(ExistingPaths(existing)),
        Box::new(SilentHost),
        Box::new(NoTemplates),
        Box::new(CountingCloud {
            account,
            lookups: Arc::clone(&lookups),
        }),
        Box::new(Quiet),
    );
    (service, lookups)
}

// ── prepare ──────────────────────────────────────────────────────────────────

#[test]
fn prepare_builds_context_under_workspace() {
    let (service, lookups) = service(Vec::new(), Some("123456789012"));
    let prompter = FixedPrompter(answers(GitProtocol::Ssh));

    let ctx = service
        .prepare(&prompter, &PromptRequest::default(), Path::new("/work"), true)
        .unwrap();

    assert_eq!(ctx.project_root(), Path::new("/work/demo-app"));
    assert_eq!(ctx.account_id().as_str(), "123456789012");
    assert!(ctx.verbose());
    assert!(ctx.cdk_version().is_none());
    assert!(ctx.remote_url().is_none());
    assert_eq!(lookups.load(Ordering::SeqCst), 1);
}

#[test]
fn prepare_refuses_an_existing_project_directory() {
    let (service, lookups) = service(vec![PathBuf::from("/work/demo-app")], Some("1"));
    let prompter = FixedPrompter(answers(GitProtocol::Https));

    let err = service
        .prepare(&prompter, &PromptRequest::default(), Path::new("/work"), false)
        .unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::ProjectExists { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(lookups.load(Ordering::SeqCst), 0, "no account lookup");
}

#[test]
fn prepare_surfaces_identity_failures() {
    let (service, _) = service(Vec::new(), None);
    let prompter = FixedPrompter(answers(GitProtocol::Https));

    let err = service
        .prepare(&prompter, &PromptRequest::default(), Path::new("/work"), false)
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Identity);
    assert!(err.to_string().contains("sandbox"));
    assert!(err.suggestions().iter().any(|s| s.contains("--profile sandbox")));
}

// ── completion ───────────────────────────────────────────────────────────────

#[test]
fn https_completion_lists_manual_commands() {
    let ctx = PipelineContext::new(
        answers(GitProtocol::Https),
        AccountId::new("123456789012").unwrap(),
        "/work",
        false,
    );

    assert_eq!(
        Completion::for_context(&ctx),
        Completion::ManualSteps {
            commands: vec![
                "cd /work/demo-app".into(),
                "git push -u origin main".into(),
                "npx cdk deploy PipelineStack --profile sandbox --require-approval=never".into(),
            ],
        }
    );
}

#[test]
fn ssh_and_codecommit_completion_is_the_pipeline_url() {
    for protocol in [GitProtocol::Ssh, GitProtocol::CodeCommit] {
        let ctx = PipelineContext::new(
            answers(protocol),
            AccountId::new("123456789012").unwrap(),
            "/work",
            false,
        );
        assert_eq!(
            Completion::for_context(&ctx),
            Completion::Deployed {
                pipeline_url: "https://eu-west-1.console.aws.amazon.com/codesuite/codepipeline/pipelines/demo-app/view".into(),
            }
        );
    }
}
