//! [`CloudProvider`] backed by the `aws` command-line tool.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, instrument};

use cdkpipe_core::{
    application::{
        ApplicationError, ProcessFailure,
        ports::{CloudProvider, CommandInvocation, ProcessHost, ProcessStatus, RepositoryRequest},
    },
    domain::AccountId,
    error::ScaffoldResult,
};

/// Subset of `aws sts get-caller-identity --output json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CallerIdentity {
    account: String,
}

/// Talks to STS and CodeCommit through the `aws` CLI.
///
/// Every call goes through the injected [`ProcessHost`], so credentials,
/// SSO sessions and proxies behave exactly as they do for the operator.
pub struct AwsCliProvider {
    host: Box<dyn ProcessHost>,
    program: String,
    working_dir: PathBuf,
}

impl AwsCliProvider {
    pub fn new(host: Box<dyn ProcessHost>) -> Self {
        Self {
            host,
            program: "aws".into(),
            working_dir: PathBuf::from("."),
        }
    }

    /// Use a different executable, e.g. an absolute path to `aws`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    fn invoke<I, S>(&self, args: I) -> Result<ProcessStatus, ProcessFailure>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = std::iter::once(self.program.clone()).chain(args.into_iter().map(Into::into));
        let invocation = CommandInvocation::argv(argv, self.working_dir.clone());
        debug!(command = %invocation.display(), "calling aws cli");
        self.host.run(&invocation)
    }
}

impl CloudProvider for AwsCliProvider {
    #[instrument(skip(self))]
    fn account_id(&self, profile: &str) -> ScaffoldResult<AccountId> {
        let identity_error = |reason: String| ApplicationError::Identity {
            profile: profile.to_string(),
            reason,
        };

        let status = self
            .invoke([
                "sts",
                "get-caller-identity",
                "--profile",
                profile,
                "--output",
                "json",
            ])
            .map_err(|e| identity_error(e.to_string()))?;
        if !status.success() {
            return Err(identity_error(failure_reason(&status)).into());
        }

        let identity: CallerIdentity = serde_json::from_str(&status.stdout)
            .map_err(|e| identity_error(format!("unexpected response: {e}")))?;
        Ok(AccountId::new(identity.account)?)
    }

    #[instrument(skip(self), fields(name = %request.name, region = %request.region))]
    fn create_repository(&self, request: &RepositoryRequest) -> ScaffoldResult<()> {
        let remote_error = |reason: String| ApplicationError::RemoteService {
            operation: "CreateRepository",
            reason,
        };

        let mut args = vec![
            "codecommit".to_string(),
            "create-repository".into(),
            "--repository-name".into(),
            request.name.clone(),
        ];
        if !request.description.is_empty() {
            args.push("--repository-description".into());
            args.push(request.description.clone());
        }
        args.extend([
            "--region".to_string(),
            request.region.to_string(),
            "--profile".into(),
            request.profile.clone(),
            "--output".into(),
            "json".into(),
        ]);

        let status = self
            .invoke(args)
            .map_err(|e| remote_error(e.to_string()))?;
        if !status.success() {
            return Err(remote_error(failure_reason(&status)).into());
        }
        Ok(())
    }
}

fn failure_reason(status: &ProcessStatus) -> String {
    let stderr = status.stderr.trim();
    if stderr.is_empty() {
        match status.code {
            Some(code) => format!("aws exited with status {code}"),
            None => "aws was terminated by a signal".into(),
        }
    } else {
        stderr.to_string()
    }
}
