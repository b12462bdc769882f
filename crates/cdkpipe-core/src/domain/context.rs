//! The pipeline context: one mutable record threaded through every step.
//!
//! The context is built once from the validated answer set and the resolved
//! account, and is never reset. Steps may read any field and may *add*
//! enrichment fields, but an enrichment field, once written, keeps its value
//! for the rest of the run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{AccountId, CdkVersion, GitProtocol, ProjectName, Region},
};

/// The validated answer set produced by the prompter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAnswers {
    pub project_name: ProjectName,
    pub project_description: String,
    pub profile_name: String,
    pub region: Region,
    pub git_protocol: GitProtocol,
    pub bootstrap_required: bool,
}

/// Shared state for one scaffolding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineContext {
    project_name: ProjectName,
    project_description: String,
    profile_name: String,
    region: Region,
    bootstrap_required: bool,
    git_protocol: GitProtocol,
    account_id: AccountId,
    verbose: bool,
    project_root: PathBuf,

    // Enrichment, written at most once by later steps.
    cdk_version: Option<CdkVersion>,
    remote_url: Option<String>,
}

impl PipelineContext {
    /// Build the context for a project created directly under `workspace`.
    pub fn new(
        answers: ProjectAnswers,
        account_id: AccountId,
        workspace: impl AsRef<Path>,
        verbose: bool,
    ) -> Self {
        let project_root = workspace.as_ref().join(answers.project_name.as_str());

        Self {
            project_name: answers.project_name,
            project_description: answers.project_description,
            profile_name: answers.profile_name,
            region: answers.region,
            bootstrap_required: answers.bootstrap_required,
            git_protocol: answers.git_protocol,
            account_id,
            verbose,
            project_root,
            cdk_version: None,
            remote_url: None,
        }
    }

    pub fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    pub fn project_description(&self) -> &str {
        &self.project_description
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn bootstrap_required(&self) -> bool {
        self.bootstrap_required
    }

    pub fn git_protocol(&self) -> GitProtocol {
        self.git_protocol
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Root of the generated project. Every filesystem path and every child
    /// process working directory is resolved against it.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Resolve a path relative to the project root.
    pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(relative)
    }

    pub fn cdk_version(&self) -> Option<&CdkVersion> {
        self.cdk_version.as_ref()
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    /// Record the CDK version found in the generated project.
    pub fn record_cdk_version(&mut self, version: CdkVersion) -> Result<(), DomainError> {
        set_once(
            &mut self.cdk_version,
            version,
            "cdk_version",
            |v: &CdkVersion| v.to_string(),
        )
    }

    /// Record the URL registered as the `origin` remote.
    pub fn record_remote_url(&mut self, url: impl Into<String>) -> Result<(), DomainError> {
        set_once(&mut self.remote_url, url.into(), "remote_url", |v: &String| {
            v.clone()
        })
    }

    /// Whether the push and deploy steps can run unattended.
    pub fn can_publish_unattended(&self) -> bool {
        !self.git_protocol.may_prompt_for_credentials()
    }
}

/// Write `value` into an append-only slot.
///
/// Re-recording the same value is a no-op; a different value is rejected.
fn set_once<T: PartialEq>(
    slot: &mut Option<T>,
    value: T,
    field: &'static str,
    show: impl Fn(&T) -> String,
) -> Result<(), DomainError> {
    match slot {
        Some(existing) if *existing == value => Ok(()),
        Some(existing) => Err(DomainError::FieldAlreadySet {
            field,
            existing: show(existing),
            attempted: show(&value),
        }),
        None => {
            *slot = Some(value);
            Ok(())
        }
    }
}
