//! Interactive prompter.
//!
//! The project name is validated as it is typed and re-asked until it is
//! well-formed; region and protocol are picked from fixed lists.

use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use tracing::instrument;

use cdkpipe_core::{
    application::{
        ApplicationError,
        ports::{PromptRequest, Prompter},
    },
    domain::{GitProtocol, ProjectAnswers, ProjectName, Region},
    error::{ScaffoldError, ScaffoldResult},
};

const DEFAULT_PROFILE: &str = "default";

/// Prompts on stderr so stdout stays clean for the final report.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn map_dialoguer_err(e: dialoguer::Error) -> ScaffoldError {
    ApplicationError::PromptAborted {
        reason: e.to_string(),
    }
    .into()
}

fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).cyan(),
        ..ColorfulTheme::default()
    }
}

impl Prompter for DialoguerPrompter {
    #[instrument(skip_all, fields(profiles = request.profiles.len()))]
    fn collect(&self, request: &PromptRequest) -> ScaffoldResult<ProjectAnswers> {
        let theme = prompt_theme();
        let term = Term::stderr();

        let name: String = Input::<String>::with_theme(&theme)
            .with_prompt("Project name (kebab-case)")
            .validate_with(|input: &String| -> Result<(), String> {
                ProjectName::parse(input.as_str())
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text_on(&term)
            .map_err(map_dialoguer_err)?;
        let project_name = ProjectName::parse(name)?;

        let project_description: String = Input::<String>::with_theme(&theme)
            .with_prompt("Project description")
            .allow_empty(true)
            .interact_text_on(&term)
            .map_err(map_dialoguer_err)?;

        let profile_name = if request.profiles.is_empty() {
            Input::<String>::with_theme(&theme)
                .with_prompt("AWS profile")
                .default(DEFAULT_PROFILE.to_string())
                .interact_text_on(&term)
                .map_err(map_dialoguer_err)?
        } else {
            let index = Select::with_theme(&theme)
                .with_prompt("AWS profile")
                .items(request.profiles.as_slice())
                .default(0)
                .interact_on(&term)
                .map_err(map_dialoguer_err)?;
            request.profiles[index].clone()
        };

        let region_labels: Vec<&str> = Region::ALL.iter().map(Region::as_str).collect();
        let region_index = Select::with_theme(&theme)
            .with_prompt("Region")
            .items(region_labels.as_slice())
            .default(position_of(&Region::ALL, &request.default_region))
            .interact_on(&term)
            .map_err(map_dialoguer_err)?;
        let region = Region::ALL[region_index];

        let protocol_labels: Vec<&str> =
            GitProtocol::ALL.iter().map(GitProtocol::as_str).collect();
        let protocol_index = Select::with_theme(&theme)
            .with_prompt("Git protocol for the CodeCommit remote")
            .items(protocol_labels.as_slice())
            .default(position_of(&GitProtocol::ALL, &request.default_protocol))
            .interact_on(&term)
            .map_err(map_dialoguer_err)?;
        let git_protocol = GitProtocol::ALL[protocol_index];

        let bootstrap_required = Confirm::with_theme(&theme)
            .with_prompt("Bootstrap the account and region for CDK pipelines?")
            .default(request.default_bootstrap)
            .interact_on(&term)
            .map_err(map_dialoguer_err)?;

        Ok(ProjectAnswers {
            project_name,
            project_description,
            profile_name,
            region,
            git_protocol,
            bootstrap_required,
        })
    }
}

/// Index of `item` in `items`, or the first entry.
fn position_of<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().position(|candidate| candidate == item).unwrap_or(0)
}
