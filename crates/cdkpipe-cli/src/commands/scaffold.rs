//! The scaffold command.
//!
//! Responsibility: wire the adapters from configuration, collect answers,
//! run the pipeline, and display the completion. No business logic lives
//! here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use cdkpipe_adapters::{
    AwsCliProvider, DirectoryTemplates, EmbeddedTemplates, LocalFilesystem, SystemProcessHost,
    aws::{credentials_file_path, list_profiles},
    template_library::resolve_override_dir,
};
use cdkpipe_core::application::{
    ScaffoldService,
    ports::{PromptRequest, Prompter, TemplateLibrary},
};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    progress::SpinnerReporter,
};

/// Execute a full scaffolding run in `workspace`.
///
/// Dispatch sequence:
/// 1. Discover credential profiles and build the prompt defaults
/// 2. Collect answers and resolve the account
/// 3. Run the step catalogue
/// 4. Print the pipeline URL or the manual steps
#[instrument(skip_all, fields(workspace = %workspace.display()))]
pub fn execute(
    workspace: PathBuf,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let workspace = std::path::absolute(&workspace)?;
    let prompter = prompter()?;
    let request = prompt_request(&config)?;

    let host = SystemProcessHost::with_timeout(config.process.timeout());
    let cloud = AwsCliProvider::new(Box::new(host))
        .with_program(config.aws.cli.clone())
        .with_working_dir(workspace.clone());
    let spinner_no_color =
        global.no_color || config.output.no_color || !std::io::stderr().is_terminal();

    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(host),
        template_library(config.templates.local_path.as_deref()),
        Box::new(cloud),
        Box::new(SpinnerReporter::new(spinner_no_color)),
    );

    let mut ctx = service.prepare(
        prompter.as_ref(),
        &request,
        &workspace,
        global.is_verbose(),
    )?;

    output.header(&format!(
        "Creating '{}' in {}",
        ctx.project_name(),
        workspace.display()
    ))?;
    let report = service.scaffold(&mut ctx)?;
    info!(
        completed = report.summary.completed.len(),
        skipped = report.summary.skipped.len(),
        "pipeline project ready"
    );

    output.completion(&report.completion)?;
    Ok(())
}

/// Prompt defaults from configuration plus the discovered profiles.
fn prompt_request(config: &AppConfig) -> CliResult<PromptRequest> {
    let profiles = match credentials_file_path(config.aws.credentials_file.as_deref()) {
        Some(path) => list_profiles(&path)?,
        None => Vec::new(),
    };

    Ok(PromptRequest {
        profiles,
        default_region: config.defaults.region,
        default_protocol: config.defaults.git_protocol,
        default_bootstrap: config.defaults.bootstrap,
    })
}

/// Built-in templates, optionally overridden from a directory.
fn template_library(configured: Option<&Path>) -> Box<dyn TemplateLibrary> {
    match resolve_override_dir(configured) {
        Some(dir) => {
            info!(dir = %dir.display(), "using template overrides");
            Box::new(DirectoryTemplates::over_embedded(dir))
        }
        None => Box::new(EmbeddedTemplates::new()),
    }
}

#[cfg(feature = "interactive")]
fn prompter() -> CliResult<Box<dyn Prompter>> {
    Ok(Box::new(crate::prompts::DialoguerPrompter::new()))
}

#[cfg(not(feature = "interactive"))]
fn prompter() -> CliResult<Box<dyn Prompter>> {
    Err(crate::error::CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use cdkpipe_core::domain::{GitProtocol, Region};

    use super::*;

    #[test]
    fn prompt_defaults_come_from_config() {
        let dir = TempDir::new().unwrap();
        let credentials = dir.path().join("credentials");
        fs::write(
            &credentials,
            "[sandbox]\naws_access_key_id = x\n\n[default]\naws_access_key_id = y\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.aws.credentials_file = Some(credentials);
        config.defaults.region = Region::UsWest2;
        config.defaults.git_protocol = GitProtocol::CodeCommit;

        let request = prompt_request(&config).unwrap();
        assert_eq!(request.profiles, vec!["default", "sandbox"]);
        assert_eq!(request.default_region, Region::UsWest2);
        assert_eq!(request.default_protocol, GitProtocol::CodeCommit);
        assert!(!request.default_bootstrap);
    }

    #[test]
    fn missing_credentials_file_offers_no_profiles() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.aws.credentials_file = Some(dir.path().join("absent"));

        assert!(prompt_request(&config).unwrap().profiles.is_empty());
    }

    #[test]
    fn override_directory_falls_back_to_built_ins() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/pipeline-stack.ts"), "// custom").unwrap();

        let library = template_library(Some(dir.path()));
        assert_eq!(library.load("lib/pipeline-stack.ts").unwrap(), "// custom");
        assert!(
            library
                .load("bin/pipeline.ts")
                .unwrap()
                .contains("{{project_name}}")
        );
    }
}
