//! Credential profile discovery from the shared credentials file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::{debug, instrument};

use cdkpipe_core::error::{ScaffoldError, ScaffoldResult};

/// Environment variable the AWS tooling uses to relocate the credentials file.
pub const CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";

const DEFAULT_PROFILE: &str = "default";

/// Locate the shared credentials file.
///
/// `$AWS_SHARED_CREDENTIALS_FILE` wins, then the configured path, then
/// `~/.aws/credentials`.
pub fn credentials_file_path(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CREDENTIALS_FILE_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    configured
        .map(Path::to_path_buf)
        .or_else(|| dirs::home_dir().map(|home| home.join(".aws").join("credentials")))
}

/// Profile names (INI section names) in the credentials file.
///
/// Names are kept exactly as written, dots and case included. `default`
/// comes first when present, the rest are sorted. A missing file yields an
/// empty list; a file that cannot be parsed is a configuration error.
#[instrument(fields(path = %path.display()))]
pub fn list_profiles(path: &Path) -> ScaffoldResult<Vec<String>> {
    if !path.is_file() {
        debug!("no credentials file");
        return Ok(Vec::new());
    }

    let credentials =
        Ini::load_from_file_noescape(path).map_err(|e| ScaffoldError::Configuration {
            message: format!("cannot read credentials file {}: {e}", path.display()),
        })?;

    let sections: BTreeSet<&str> = credentials
        .sections()
        .flatten()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    let mut profiles: Vec<String> = sections.into_iter().map(String::from).collect();
    if let Some(pos) = profiles.iter().position(|p| p == DEFAULT_PROFILE) {
        let default = profiles.remove(pos);
        profiles.insert(0, default);
    }
    debug!(count = profiles.len(), "credential profiles discovered");
    Ok(profiles)
}
