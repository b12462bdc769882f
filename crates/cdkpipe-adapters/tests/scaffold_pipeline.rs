//! End-to-end runs of the scaffold pipeline against in-memory adapters.

use std::path::Path;
use std::sync::{Arc, Mutex};

use cdkpipe_adapters::{AwsCliProvider, EmbeddedTemplates, MemoryFilesystem, ScriptedProcessHost};
use cdkpipe_core::{
    application::services::scaffold::{
        COMMIT, CONNECT_REMOTE, CREATE_REPOSITORY, DEPLOY, INSTALL_DEPENDENCIES, PUSH,
    },
    prelude::*,
};

// ── Test doubles ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Started(String),
    Succeeded(String),
    Failed(String),
    Detail(String),
}

#[derive(Clone, Default)]
struct RecordingReporter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingReporter {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Succeeded(label) => Some(label),
                _ => None,
            })
            .collect()
    }

    fn failures(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Failed(label) => Some(label),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn started(&self, label: &str) {
        self.events.lock().unwrap().push(Event::Started(label.into()));
    }

    fn succeeded(&self, label: &str) {
        self.events.lock().unwrap().push(Event::Succeeded(label.into()));
    }

    fn failed(&self, label: &str, _error: &str) {
        self.events.lock().unwrap().push(Event::Failed(label.into()));
    }

    fn detail(&self, text: &str) {
        self.events.lock().unwrap().push(Event::Detail(text.into()));
    }
}

struct FixedPrompter(ProjectAnswers);

impl Prompter for FixedPrompter {
    fn collect(&self, _request: &PromptRequest) -> ScaffoldResult<ProjectAnswers> {
        Ok(self.0.clone())
    }
}

// ── Fixture ──────────────────────────────────────────────────────────────────

const WORKSPACE: &str = "/work";
const STS_RESPONSE: &str = r#"{"UserId":"AIDA","Account":"123456789012","Arn":"arn"}"#;

/// Seed what `cdk init --language typescript` generates for a v1 app.
fn seed_cdk_app(fs: MemoryFilesystem) -> impl Fn(&CommandInvocation) + Send + Sync + 'static {
    move |invocation: &CommandInvocation| {
        let root = &invocation.working_dir;
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        fs.add_file(
            root.join("cdk.json"),
            format!(
                r#"{{"app":"npx ts-node --prefer-ts-exts bin/{name}.ts","context":{{"@aws-cdk/core:enableStackNameDuplicates":"true"}}}}"#
            ),
        );
        fs.add_file(
            root.join("package.json"),
            format!(
                r#"{{"name":"{name}","dependencies":{{"@aws-cdk/core":"1.134.0","source-map-support":"^0.5.16"}}}}"#
            ),
        );
        fs.add_file(root.join(format!("bin/{name}.ts")), "// generated app");
        fs.add_file(root.join(format!("lib/{name}-stack.ts")), "// generated stack");
        fs.add_file(root.join(format!("test/{name}.test.ts")), "// generated test");
    }
}

struct Harness {
    fs: MemoryFilesystem,
    host: ScriptedProcessHost,
    reporter: RecordingReporter,
    service: ScaffoldService,
}

impl Harness {
    fn new() -> Self {
        Self::with_host(ScriptedProcessHost::new())
    }

    fn with_host(host: ScriptedProcessHost) -> Self {
        let fs = MemoryFilesystem::new();
        fs.add_dir(WORKSPACE);

        let host = host
            .respond("aws sts get-caller-identity", ProcessStatus::ok(STS_RESPONSE))
            .on_run("npx cdk init", seed_cdk_app(fs.clone()));
        let reporter = RecordingReporter::default();

        let service = ScaffoldService::new(
            Box::new(fs.clone()),
            Box::new(host.clone()),
            Box::new(EmbeddedTemplates::new()),
            Box::new(AwsCliProvider::new(Box::new(host.clone()))),
            Box::new(reporter.clone()),
        );

        Self {
            fs,
            host,
            reporter,
            service,
        }
    }

    fn prepare(&self, protocol: GitProtocol, bootstrap: bool) -> ScaffoldResult<PipelineContext> {
        let prompter = FixedPrompter(ProjectAnswers {
            project_name: ProjectName::parse("demo-app").unwrap(),
            project_description: "Demo pipeline".into(),
            profile_name: "sandbox".into(),
            region: Region::EuWest1,
            git_protocol: protocol,
            bootstrap_required: bootstrap,
        });
        self.service.prepare(
            &prompter,
            &PromptRequest::default(),
            Path::new(WORKSPACE),
            false,
        )
    }

    fn file(&self, relative: &str) -> Option<String> {
        self.fs
            .read_file(Path::new(WORKSPACE).join("demo-app").join(relative))
    }

    fn position(&self, prefix: &str) -> Option<usize> {
        self.host
            .commands()
            .iter()
            .position(|c| c.starts_with(prefix))
    }
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn https_run_completes_with_manual_steps() {
    let harness = Harness::new();
    let mut ctx = harness.prepare(GitProtocol::Https, false).unwrap();

    let report = harness.service.scaffold(&mut ctx).unwrap();

    assert_eq!(harness.reporter.successes().len(), 9);
    assert!(harness.reporter.failures().is_empty());
    assert_eq!(report.summary.completed.len(), 9);
    assert_eq!(
        report.summary.skipped,
        vec![
            PUSH.to_string(),
            "Bootstrapping eu-west-1 region".into(),
            DEPLOY.into()
        ]
    );

    match report.completion {
        Completion::ManualSteps { commands } => {
            assert_eq!(commands.len(), 3);
            assert_eq!(commands[0], "cd /work/demo-app");
            assert_eq!(commands[1], "git push -u origin main");
            assert!(commands[2].starts_with("npx cdk deploy PipelineStack --profile sandbox"));
        }
        other => panic!("expected manual steps, got {other:?}"),
    }

    let commands = harness.host.commands();
    assert!(!commands.iter().any(|c| c.starts_with("git push")));
    assert!(!commands.iter().any(|c| c.starts_with("npx cdk deploy")));
    assert!(!commands.iter().any(|c| c.starts_with("npx cdk bootstrap")));
}

#[test]
fn https_run_leaves_expected_project_layout() {
    let harness = Harness::new();
    let mut ctx = harness.prepare(GitProtocol::Https, false).unwrap();
    harness.service.scaffold(&mut ctx).unwrap();

    let cdk_json: serde_json::Value =
        serde_json::from_str(&harness.file("cdk.json").unwrap()).unwrap();
    assert_eq!(
        cdk_json["context"]["@aws-cdk/core:newStyleStackSynthesis"],
        true
    );
    assert_eq!(
        cdk_json["context"]["@aws-cdk/core:enableStackNameDuplicates"],
        "true"
    );

    let bin = harness.file("bin/demo-app.ts").unwrap();
    assert!(bin.contains("account: '123456789012', region: 'eu-west-1'"));
    assert!(bin.contains("stackName: 'demo-app-pipeline'"));
    assert!(!bin.contains("{{"));

    let stack = harness.file("lib/pipeline-stack.ts").unwrap();
    assert!(!stack.contains("{{"));
    assert!(stack.contains("pipelineName: 'demo-app'"));

    assert!(harness.file("lib/scheduled-lambda-stack.ts").is_some());
    assert!(harness.file("lib/scheduled-lambda-stack.lambda.ts").is_some());
    assert!(harness.file("lib/demo-app-stack.ts").is_none());
    assert!(harness.file("test/demo-app.test.ts").is_none());
    assert_eq!(
        harness.file("test/demo-app.test.ts.OLD").as_deref(),
        Some("// generated test")
    );

    assert_eq!(ctx.cdk_version(), Some(&CdkVersion::V1("1.134.0".into())));
    assert_eq!(
        ctx.remote_url(),
        Some("https://git-codecommit.eu-west-1.amazonaws.com/v1/repos/demo-app")
    );
}

#[test]
fn every_command_runs_in_the_project_root() {
    let harness = Harness::new();
    let mut ctx = harness.prepare(GitProtocol::Https, false).unwrap();
    harness.service.scaffold(&mut ctx).unwrap();

    let project_root = Path::new(WORKSPACE).join("demo-app");
    for invocation in harness.host.invocations() {
        if invocation.display().starts_with("aws ") {
            continue;
        }
        assert_eq!(
            invocation.working_dir,
            project_root,
            "{}",
            invocation.display()
        );
    }
}

#[test]
fn ssh_run_pushes_bootstraps_and_deploys() {
    let harness = Harness::new();
    let mut ctx = harness.prepare(GitProtocol::Ssh, true).unwrap();

    let report = harness.service.scaffold(&mut ctx).unwrap();

    assert_eq!(harness.reporter.successes().len(), 12);
    assert!(report.summary.skipped.is_empty());
    assert_eq!(
        report.completion,
        Completion::Deployed {
            pipeline_url: "https://eu-west-1.console.aws.amazon.com/codesuite/codepipeline/pipelines/demo-app/view".into()
        }
    );

    let remote = harness.position("git remote add origin ssh://").unwrap();
    let push = harness.position("git push -u origin main").unwrap();
    let bootstrap = harness.position("npx cdk bootstrap").unwrap();
    let deploy = harness.position("npx cdk deploy PipelineStack").unwrap();
    assert!(remote < push && push < bootstrap && bootstrap < deploy);

    let bootstrap_env = &harness.host.invocations()[bootstrap].env;
    assert!(bootstrap_env.contains(&("CDK_NEW_BOOTSTRAP".to_string(), "1".to_string())));
}

#[test]
fn codecommit_run_registers_helper_remote() {
    let harness = Harness::new();
    let mut ctx = harness.prepare(GitProtocol::CodeCommit, false).unwrap();
    harness.service.scaffold(&mut ctx).unwrap();

    assert!(harness
        .host
        .commands()
        .contains(&"git remote add origin codecommit::eu-west-1://sandbox@demo-app".to_string()));
    assert!(harness.position("npx cdk deploy").is_some());
}

#[test]
fn failing_install_stops_the_run_and_keeps_stderr() {
    let host = ScriptedProcessHost::new().respond(
        "npm install",
        ProcessStatus {
            code: Some(1),
            stdout: String::new(),
            stderr: "npm ERR! code ERESOLVE".into(),
        },
    );
    let harness = Harness::with_host(host);
    let mut ctx = harness.prepare(GitProtocol::Ssh, false).unwrap();

    let failure = harness.service.scaffold(&mut ctx).unwrap_err();

    assert_eq!(failure.step, INSTALL_DEPENDENCIES);
    assert_eq!(failure.stderr(), Some("npm ERR! code ERESOLVE"));
    assert_eq!(harness.reporter.successes().len(), 5);
    assert_eq!(harness.reporter.failures(), vec![INSTALL_DEPENDENCIES.to_string()]);

    // Nothing after the failing step was attempted.
    let labels_started: Vec<Event> = harness
        .reporter
        .events()
        .into_iter()
        .filter(|e| matches!(e, Event::Started(l) if l == COMMIT || l == CONNECT_REMOTE))
        .collect();
    assert!(labels_started.is_empty());
    assert!(harness.position("git").is_none());
    assert!(harness.position("aws codecommit").is_none());

    // Work already done stays on disk and is listed for cleanup.
    assert!(harness.file("lib/pipeline-stack.ts").is_some());
    assert_eq!(failure.completed.len(), 5);
    assert_eq!(failure.cleanup.len(), 1);
    assert!(failure.cleanup[0].ends_with("remove /work/demo-app"));
}

#[test]
fn failing_push_reports_the_created_repository() {
    let host = ScriptedProcessHost::new().respond(
        "git push",
        ProcessStatus {
            code: Some(128),
            stdout: String::new(),
            stderr: "fatal: unable to access".into(),
        },
    );
    let harness = Harness::with_host(host);
    let mut ctx = harness.prepare(GitProtocol::Ssh, false).unwrap();

    let failure = harness.service.scaffold(&mut ctx).unwrap_err();

    assert_eq!(failure.step, PUSH);
    assert!(failure.completed_step(CREATE_REPOSITORY));
    assert_eq!(failure.cleanup.len(), 2);
    assert!(failure.cleanup[1].contains(
        "aws codecommit delete-repository --repository-name demo-app \
         --region eu-west-1 --profile sandbox"
    ));
    assert!(
        failure
            .suggestions()
            .contains(&"The run left the following behind:".to_string())
    );
}

#[test]
fn existing_project_directory_is_refused_before_any_command() {
    let harness = Harness::new();
    harness.fs.add_dir("/work/demo-app");

    let err = harness.prepare(GitProtocol::Https, false).unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::ProjectExists { .. })
    ));
    assert!(harness.host.commands().is_empty());
    assert!(harness.reporter.events().is_empty());
}
