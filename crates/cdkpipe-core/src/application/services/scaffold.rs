//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire scaffolding workflow:
//! 1. Collect answers and resolve the account (`prepare`)
//! 2. Run the fixed step catalogue against the context (`scaffold`)
//! 3. Produce the completion: pipeline URL or manual commands
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::Path;

use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        error::{IoFailure, StepFailure},
        ports::{
            CloudProvider, CommandInvocation, Filesystem, ProcessHost, ProgressReporter,
            PromptRequest, Prompter, RepositoryRequest, TemplateLibrary, display_args,
        },
        services::{
            orchestrator::{RunSummary, Step, StepOrchestrator},
            process::ProcessRunner,
            template::{TemplateJob, TemplateRenderer},
        },
    },
    domain::{
        CdkVersion, PipelineContext, RenderContext, pipeline_console_url, resolve_remote_url,
    },
    error::ScaffoldResult,
};

// Step labels shown by the progress reporter. `mkdir` and bootstrap labels
// carry the project name and region respectively.
pub const CDK_INIT: &str = "Running npx cdk init";
pub const ENABLE_SYNTHESIS: &str = "Enabling new-style stack synthesis";
pub const REPLACE_GENERATED: &str = "Replacing generated stack and test";
pub const RENDER_PIPELINE: &str = "Rendering pipeline code";
pub const INSTALL_DEPENDENCIES: &str = "Installing missing dependencies";
pub const COMMIT: &str = "Saving changes to git";
pub const CREATE_REPOSITORY: &str = "Creating CodeCommit repo";
pub const CONNECT_REMOTE: &str = "Connecting git remote";
pub const PUSH: &str = "Pushing to remote";
pub const DEPLOY: &str = "Deploying pipeline";

/// Template library paths.
pub mod templates {
    pub const BIN_PIPELINE: &str = "bin/pipeline.ts";
    pub const PIPELINE_STACK: &str = "lib/pipeline-stack.ts";
    pub const SCHEDULED_LAMBDA_STACK: &str = "lib/scheduled-lambda-stack.ts";
    pub const SCHEDULED_LAMBDA_HANDLER: &str = "lib/scheduled-lambda-stack.lambda.ts";

    pub const ALL: [&str; 4] = [
        BIN_PIPELINE,
        PIPELINE_STACK,
        SCHEDULED_LAMBDA_STACK,
        SCHEDULED_LAMBDA_HANDLER,
    ];
}

const SYNTHESIS_FLAG: &str = "@aws-cdk/core:newStyleStackSynthesis";
const COMMIT_MESSAGE: &str = "Create changes for cdk pipelines";
const EXECUTION_POLICY: &str = "arn:aws:iam::aws:policy/AdministratorAccess";
const PIPELINE_STACK_ID: &str = "PipelineStack";

/// Pipeline modules `cdk init` does not install on CDK v1.
const V1_PIPELINE_MODULES: [&str; 5] = [
    "@aws-cdk/aws-lambda-nodejs",
    "@aws-cdk/aws-events",
    "@aws-cdk/aws-events-targets",
    "@aws-cdk/pipelines",
    "@aws-cdk/aws-codecommit",
];
const DEV_DEPENDENCIES: [&str; 2] = ["esbuild@0", "@types/aws-lambda"];

/// What the operator gets once every applicable step succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The pipeline was deployed.
    Deployed { pipeline_url: String },
    /// Push and deploy were left to the operator.
    ManualSteps { commands: Vec<String> },
}

impl Completion {
    pub fn for_context(ctx: &PipelineContext) -> Self {
        if ctx.can_publish_unattended() {
            Self::Deployed {
                pipeline_url: pipeline_console_url(ctx.project_name().as_str(), ctx.region()),
            }
        } else {
            let root = ctx.project_root().to_string_lossy();
            Self::ManualSteps {
                commands: vec![
                    display_args(&["cd", root.as_ref()]),
                    display_args(&push_args()),
                    display_args(&deploy_args(ctx.profile_name())),
                ],
            }
        }
    }
}

/// Result of a successful scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub summary: RunSummary,
    pub completion: Completion,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    host: Box<dyn ProcessHost>,
    templates: Box<dyn TemplateLibrary>,
    cloud: Box<dyn CloudProvider>,
    reporter: Box<dyn ProgressReporter>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        host: Box<dyn ProcessHost>,
        templates: Box<dyn TemplateLibrary>,
        cloud: Box<dyn CloudProvider>,
        reporter: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            filesystem,
            host,
            templates,
            cloud,
            reporter,
        }
    }

    /// Collect answers and build the initial context.
    ///
    /// Fails before anything is created when the project directory already
    /// exists or the profile cannot be resolved to an account.
    #[instrument(skip_all, fields(workspace = %workspace.display()))]
    pub fn prepare(
        &self,
        prompter: &dyn Prompter,
        request: &PromptRequest,
        workspace: &Path,
        verbose: bool,
    ) -> ScaffoldResult<PipelineContext> {
        let answers = prompter.collect(request)?;

        let project_root = workspace.join(answers.project_name.as_str());
        if self.filesystem.exists(&project_root) {
            return Err(ApplicationError::ProjectExists { path: project_root }.into());
        }

        let account_id = self.cloud.account_id(&answers.profile_name)?;
        info!(
            project = %answers.project_name,
            account = %account_id,
            region = %answers.region,
            "context ready"
        );

        Ok(PipelineContext::new(answers, account_id, workspace, verbose))
    }

    /// Run the step catalogue against `ctx`.
    #[instrument(skip_all, fields(project = %ctx.project_name(), protocol = %ctx.git_protocol()))]
    pub fn scaffold(&self, ctx: &mut PipelineContext) -> Result<ScaffoldReport, StepFailure> {
        let pipeline = ScaffoldPipeline::new(
            self.filesystem.as_ref(),
            self.host.as_ref(),
            self.templates.as_ref(),
            self.cloud.as_ref(),
            self.reporter.as_ref(),
        );
        let steps = pipeline.steps(ctx);

        let summary = StepOrchestrator::new(self.reporter.as_ref())
            .run(&steps, ctx)
            .map_err(|failure| {
                let cleanup = leftovers(ctx, &failure);
                failure.with_cleanup(cleanup)
            })?;
        info!(
            completed = summary.completed.len(),
            skipped = summary.skipped.len(),
            "scaffold completed"
        );

        Ok(ScaffoldReport {
            summary,
            completion: Completion::for_context(ctx),
        })
    }
}

/// The fixed step catalogue and the work behind each step.
pub struct ScaffoldPipeline<'a> {
    filesystem: &'a dyn Filesystem,
    cloud: &'a dyn CloudProvider,
    runner: ProcessRunner<'a>,
    renderer: TemplateRenderer<'a>,
}

impl<'a> ScaffoldPipeline<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        host: &'a dyn ProcessHost,
        templates: &'a dyn TemplateLibrary,
        cloud: &'a dyn CloudProvider,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            filesystem,
            cloud,
            runner: ProcessRunner::new(host, reporter),
            renderer: TemplateRenderer::new(templates, filesystem),
        }
    }

    /// The ordered steps for a run. Labels are resolved against `ctx`.
    pub fn steps(&self, ctx: &PipelineContext) -> Vec<Step<'_>> {
        vec![
            Step::new(mkdir_label(ctx), move |ctx| self.make_project_dir(ctx)),
            Step::new(CDK_INIT, move |ctx| self.cdk_init(ctx)),
            Step::new(ENABLE_SYNTHESIS, move |ctx| self.enable_new_style_synthesis(ctx)),
            Step::new(REPLACE_GENERATED, move |ctx| self.replace_generated_stack(ctx)),
            Step::new(RENDER_PIPELINE, move |ctx| self.render_pipeline_code(ctx)),
            Step::new(INSTALL_DEPENDENCIES, move |ctx| self.install_dependencies(ctx)),
            Step::new(COMMIT, move |ctx| self.commit(ctx)),
            Step::new(CREATE_REPOSITORY, move |ctx| self.create_repository(ctx)),
            Step::new(CONNECT_REMOTE, move |ctx| self.connect_remote(ctx)),
            Step::new(PUSH, move |ctx| self.push(ctx)).when(PipelineContext::can_publish_unattended),
            Step::new(bootstrap_label(ctx), move |ctx| self.bootstrap(ctx))
            .when(PipelineContext::bootstrap_required),
            Step::new(DEPLOY, move |ctx| self.deploy(ctx)).when(PipelineContext::can_publish_unattended),
        ]
    }

    fn make_project_dir(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        self.filesystem.create_dir(ctx.project_root())?;
        Ok(())
    }

    fn cdk_init(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        let init = CommandInvocation::line("npx cdk init --language typescript", ctx.project_root())?;
        self.runner.execute(&init, ctx.verbose())?;
        Ok(())
    }

    fn enable_new_style_synthesis(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        let path = ctx.project_path("cdk.json");
        let mut document = self.read_json(&path)?;
        let malformed = |reason: &str| IoFailure::MalformedData {
            path: path.clone(),
            reason: reason.to_string(),
        };

        let root = document
            .as_object_mut()
            .ok_or_else(|| malformed("top level is not an object"))?;
        let context = root
            .entry("context")
            .or_insert_with(|| Value::Object(Default::default()))
            .as_object_mut()
            .ok_or_else(|| malformed("\"context\" is not an object"))?;
        context.insert(SYNTHESIS_FLAG.to_string(), Value::Bool(true));

        let pretty = serde_json::to_string_pretty(&document)
            .map_err(|e| malformed(&e.to_string()))?;
        self.filesystem.write_file(&path, &pretty)?;
        Ok(())
    }

    fn replace_generated_stack(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        let name = ctx.project_name();
        self.filesystem
            .remove_file(&ctx.project_path(format!("lib/{name}-stack.ts")))?;
        self.filesystem.rename(
            &ctx.project_path(format!("test/{name}.test.ts")),
            &ctx.project_path(format!("test/{name}.test.ts.OLD")),
        )?;
        Ok(())
    }

    fn render_pipeline_code(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        let variables = RenderContext::for_pipeline(ctx);
        let jobs = [
            TemplateJob::new(
                templates::BIN_PIPELINE,
                variables.clone(),
                ctx.project_path(format!("bin/{}.ts", ctx.project_name())),
            ),
            TemplateJob::new(
                templates::PIPELINE_STACK,
                variables,
                ctx.project_path(templates::PIPELINE_STACK),
            ),
        ];
        for job in &jobs {
            self.renderer.render(job)?;
        }

        for verbatim in [
            templates::SCHEDULED_LAMBDA_STACK,
            templates::SCHEDULED_LAMBDA_HANDLER,
        ] {
            self.renderer.copy(verbatim, &ctx.project_path(verbatim))?;
        }
        Ok(())
    }

    fn install_dependencies(&self, ctx: &mut PipelineContext) -> ScaffoldResult<()> {
        let path = ctx.project_path("package.json");
        let document = self.read_json(&path)?;
        let version =
            CdkVersion::from_package_json(&document).ok_or_else(|| IoFailure::MalformedData {
                path: path.clone(),
                reason: format!(
                    "no version for {} or {} under \"dependencies\"",
                    CdkVersion::V1_CORE_PACKAGE,
                    CdkVersion::V2_LIB_PACKAGE
                ),
            })?;
        info!(cdk = %version, "detected CDK version");
        ctx.record_cdk_version(version.clone())?;

        let root = ctx.project_root();
        let mut commands = Vec::with_capacity(2);
        if let CdkVersion::V1(pinned) = &version {
            let mut args: Vec<String> = ["npm", "install", "--save", "--save-exact"]
                .map(String::from)
                .to_vec();
            args.extend(V1_PIPELINE_MODULES.iter().map(|m| format!("{m}@{pinned}")));
            commands.push(CommandInvocation::argv(args, root));
        }
        commands.push(CommandInvocation::argv(
            ["npm", "install", "--save-dev"].into_iter().chain(DEV_DEPENDENCIES),
            root,
        ));

        self.runner.execute_all(&commands, ctx.verbose())?;
        Ok(())
    }

    fn commit(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        let root = ctx.project_root();
        let commands = [
            CommandInvocation::argv(["git", "branch", "-m", "main"], root),
            CommandInvocation::argv(["git", "add", "."], root),
            CommandInvocation::shell(format!("git commit -m \"{COMMIT_MESSAGE}\""), root),
        ];
        self.runner.execute_all(&commands, ctx.verbose())?;
        Ok(())
    }

    fn create_repository(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        self.cloud.create_repository(&RepositoryRequest {
            name: ctx.project_name().to_string(),
            description: ctx.project_description().to_string(),
            region: ctx.region(),
            profile: ctx.profile_name().to_string(),
        })
    }

    fn connect_remote(&self, ctx: &mut PipelineContext) -> ScaffoldResult<()> {
        let url = resolve_remote_url(
            ctx.git_protocol(),
            ctx.project_name().as_str(),
            ctx.region(),
            ctx.profile_name(),
        );
        ctx.record_remote_url(url.clone())?;

        let add = CommandInvocation::argv(
            ["git", "remote", "add", "origin", url.as_str()],
            ctx.project_root(),
        );
        self.runner.execute(&add, ctx.verbose())?;
        Ok(())
    }

    fn push(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        let push = CommandInvocation::argv(push_args(), ctx.project_root());
        self.runner.execute(&push, ctx.verbose())?;
        Ok(())
    }

    fn bootstrap(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        let environment = format!("aws://{}/{}", ctx.account_id(), ctx.region());
        let bootstrap = CommandInvocation::argv(
            [
                "npx",
                "cdk",
                "bootstrap",
                "--profile",
                ctx.profile_name(),
                "--cloudformation-execution-policies",
                EXECUTION_POLICY,
                environment.as_str(),
            ],
            ctx.project_root(),
        )
        .with_env("CDK_NEW_BOOTSTRAP", "1");
        self.runner.execute(&bootstrap, ctx.verbose())?;
        Ok(())
    }

    fn deploy(&self, ctx: &PipelineContext) -> ScaffoldResult<()> {
        let deploy = CommandInvocation::argv(deploy_args(ctx.profile_name()), ctx.project_root());
        self.runner.execute(&deploy, ctx.verbose())?;
        Ok(())
    }

    fn read_json(&self, path: &Path) -> Result<Value, IoFailure> {
        let raw = self.filesystem.read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| IoFailure::MalformedData {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn mkdir_label(ctx: &PipelineContext) -> String {
    format!("mkdir {}", ctx.project_name())
}

fn bootstrap_label(ctx: &PipelineContext) -> String {
    format!("Bootstrapping {} region", ctx.region())
}

/// External state a failed run leaves behind, as manual cleanup lines.
fn leftovers(ctx: &PipelineContext, failure: &StepFailure) -> Vec<String> {
    let mut cleanup = Vec::new();

    if failure.completed_step(&mkdir_label(ctx)) {
        cleanup.push(format!(
            "Project directory (generated code, node_modules, local git history): remove {}",
            ctx.project_root().display()
        ));
    }
    if failure.completed_step(CREATE_REPOSITORY) {
        let pushed = if failure.completed_step(PUSH) {
            " with the pushed main branch"
        } else {
            ""
        };
        cleanup.push(format!(
            "CodeCommit repository {name} in {region}{pushed}: {delete}",
            name = ctx.project_name(),
            region = ctx.region(),
            delete = display_args(&[
                "aws",
                "codecommit",
                "delete-repository",
                "--repository-name",
                ctx.project_name().as_str(),
                "--region",
                ctx.region().as_str(),
                "--profile",
                ctx.profile_name(),
            ]),
        ));
    }
    if failure.completed_step(&bootstrap_label(ctx)) {
        cleanup.push(format!(
            "CDKToolkit bootstrap stack in {}: keep it for later deploys or delete it in CloudFormation",
            ctx.region()
        ));
    }
    if failure.step == DEPLOY {
        cleanup.push(format!(
            "Stack {PIPELINE_STACK_ID} in {} may be rolled back: delete it in CloudFormation before retrying",
            ctx.region()
        ));
    }
    cleanup
}

fn push_args() -> Vec<String> {
    ["git", "push", "-u", "origin", "main"]
        .map(String::from)
        .to_vec()
}

fn deploy_args(profile: &str) -> Vec<String> {
    [
        "npx",
        "cdk",
        "deploy",
        PIPELINE_STACK_ID,
        "--profile",
        profile,
        "--require-approval=never",
    ]
    .map(String::from)
    .to_vec()
}
