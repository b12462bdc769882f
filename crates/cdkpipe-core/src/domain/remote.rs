//! Remote repository addressing.
//!
//! Pure functions mapping a git protocol and the project identity to the
//! URLs the pipeline registers and prints.

use crate::domain::{
    error::DomainError,
    value_objects::{GitProtocol, Region},
};

const PROVIDER_HOST: &str = "codecommit";
const CLOUD_DOMAIN: &str = "amazonaws.com";

/// Connection URL for the remote source repository.
///
/// | protocol | URL |
/// |----------|-----|
/// | `https://` | `https://git-codecommit.<region>.amazonaws.com/v1/repos/<name>` |
/// | `ssh://` | `ssh://git-codecommit.<region>.amazonaws.com/v1/repos/<name>` |
/// | `codecommit://` | `codecommit::<region>://<profile>@<name>` |
pub fn resolve_remote_url(
    protocol: GitProtocol,
    project_name: &str,
    region: Region,
    profile_name: &str,
) -> String {
    match protocol {
        GitProtocol::Https => {
            format!("https://git-{PROVIDER_HOST}.{region}.{CLOUD_DOMAIN}/v1/repos/{project_name}")
        }
        GitProtocol::Ssh => {
            format!("ssh://git-{PROVIDER_HOST}.{region}.{CLOUD_DOMAIN}/v1/repos/{project_name}")
        }
        GitProtocol::CodeCommit => {
            format!("{PROVIDER_HOST}::{region}://{profile_name}@{project_name}")
        }
    }
}

/// Same as [`resolve_remote_url`] for a protocol still in its textual form.
///
/// The protocol is chosen from a fixed list upstream, so an unrecognised
/// value here is a defect and surfaces as [`DomainError::UnknownProtocol`].
pub fn resolve_remote_url_str(
    protocol: &str,
    project_name: &str,
    region: Region,
    profile_name: &str,
) -> Result<String, DomainError> {
    let protocol: GitProtocol = protocol.parse()?;
    Ok(resolve_remote_url(protocol, project_name, region, profile_name))
}

/// Console URL of the deployed CodePipeline.
pub fn pipeline_console_url(project_name: &str, region: Region) -> String {
    format!(
        "https://{region}.console.aws.amazon.com/codesuite/codepipeline/pipelines/{project_name}/view"
    )
}
