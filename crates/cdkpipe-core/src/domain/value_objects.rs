//! Domain value objects: ProjectName, Region, GitProtocol, AccountId, CdkVersion.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Each
//! validated type can only be constructed through its parser, so holding one
//! is proof that the input passed validation.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ProjectName ──────────────────────────────────────────────────────────────

/// A kebab-case project identifier.
///
/// Matches `^[a-z][a-z0-9]*(-[a-z0-9]+)*$`. Used verbatim as the directory
/// name, the repository name, and the stack name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let name = raw.into();
        let invalid = |reason| DomainError::InvalidProjectName {
            name: name.clone(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(invalid("name must start with a lowercase letter"));
        }
        for segment in name.split('-') {
            if segment.is_empty() {
                return Err(invalid("hyphens must separate non-empty segments"));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            {
                return Err(invalid("only lowercase letters, digits and hyphens are allowed"));
            }
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProjectName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

// ── Region ───────────────────────────────────────────────────────────────────

/// A supported AWS region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    UsEast2,
    UsEast1,
    UsWest1,
    UsWest2,
    AfSouth1,
    ApEast1,
    ApSouth1,
    ApNortheast3,
    ApNortheast2,
    ApSoutheast1,
    ApSoutheast2,
    ApNortheast1,
    CaCentral1,
    EuCentral1,
    EuWest1,
    EuWest2,
    EuSouth1,
    EuWest3,
    EuNorth1,
    MeSouth1,
    SaEast1,
}

impl Region {
    /// Every supported region, in the order they are offered to the user.
    pub const ALL: [Region; 21] = [
        Self::UsEast2,
        Self::UsEast1,
        Self::UsWest1,
        Self::UsWest2,
        Self::AfSouth1,
        Self::ApEast1,
        Self::ApSouth1,
        Self::ApNortheast3,
        Self::ApNortheast2,
        Self::ApSoutheast1,
        Self::ApSoutheast2,
        Self::ApNortheast1,
        Self::CaCentral1,
        Self::EuCentral1,
        Self::EuWest1,
        Self::EuWest2,
        Self::EuSouth1,
        Self::EuWest3,
        Self::EuNorth1,
        Self::MeSouth1,
        Self::SaEast1,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UsEast2 => "us-east-2",
            Self::UsEast1 => "us-east-1",
            Self::UsWest1 => "us-west-1",
            Self::UsWest2 => "us-west-2",
            Self::AfSouth1 => "af-south-1",
            Self::ApEast1 => "ap-east-1",
            Self::ApSouth1 => "ap-south-1",
            Self::ApNortheast3 => "ap-northeast-3",
            Self::ApNortheast2 => "ap-northeast-2",
            Self::ApSoutheast1 => "ap-southeast-1",
            Self::ApSoutheast2 => "ap-southeast-2",
            Self::ApNortheast1 => "ap-northeast-1",
            Self::CaCentral1 => "ca-central-1",
            Self::EuCentral1 => "eu-central-1",
            Self::EuWest1 => "eu-west-1",
            Self::EuWest2 => "eu-west-2",
            Self::EuSouth1 => "eu-south-1",
            Self::EuWest3 => "eu-west-3",
            Self::EuNorth1 => "eu-north-1",
            Self::MeSouth1 => "me-south-1",
            Self::SaEast1 => "sa-east-1",
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::EuWest1
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| DomainError::UnsupportedRegion(s.to_string()))
    }
}

impl TryFrom<String> for Region {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.as_str().to_string()
    }
}

// ── GitProtocol ──────────────────────────────────────────────────────────────

/// The scheme used to address the remote CodeCommit repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GitProtocol {
    /// Secure web. Pushing may prompt for credentials.
    Https,
    /// `git-remote-codecommit` helper, authenticated through a profile.
    CodeCommit,
    /// Secure shell.
    Ssh,
}

impl GitProtocol {
    pub const ALL: [GitProtocol; 3] = [Self::Https, Self::CodeCommit, Self::Ssh];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Https => "https://",
            Self::CodeCommit => "codecommit://",
            Self::Ssh => "ssh://",
        }
    }

    /// Whether git may ask for credentials interactively over this protocol.
    ///
    /// A pipeline run cannot answer such a prompt, so push and deploy are
    /// left to the operator.
    pub const fn may_prompt_for_credentials(self) -> bool {
        matches!(self, Self::Https)
    }
}

impl fmt::Display for GitProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GitProtocol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "https://" | "https" => Ok(Self::Https),
            "codecommit://" | "codecommit" => Ok(Self::CodeCommit),
            "ssh://" | "ssh" => Ok(Self::Ssh),
            _ => Err(DomainError::UnknownProtocol(s.to_string())),
        }
    }
}

impl TryFrom<String> for GitProtocol {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GitProtocol> for String {
    fn from(value: GitProtocol) -> Self {
        value.as_str().to_string()
    }
}

// ── AccountId ────────────────────────────────────────────────────────────────

/// The cloud account a credential profile resolves to. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyAccountId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

// ── CdkVersion ───────────────────────────────────────────────────────────────

/// The CDK version `cdk init` pinned in the generated `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "major", content = "version", rename_all = "lowercase")]
pub enum CdkVersion {
    /// Modular `@aws-cdk/*` packages; every module must share this version.
    V1(String),
    /// Monolithic `aws-cdk-lib`.
    V2(String),
}

impl CdkVersion {
    pub const V1_CORE_PACKAGE: &'static str = "@aws-cdk/core";
    pub const V2_LIB_PACKAGE: &'static str = "aws-cdk-lib";

    /// Pick the CDK version out of a parsed `package.json` document.
    ///
    /// Returns `None` when neither package is listed under `dependencies`
    /// with a string version.
    pub fn from_package_json(document: &serde_json::Value) -> Option<Self> {
        let deps = document.get("dependencies")?;
        let lookup = |package: &str| {
            deps.get(package)
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        lookup(Self::V1_CORE_PACKAGE)
            .map(Self::V1)
            .or_else(|| lookup(Self::V2_LIB_PACKAGE).map(Self::V2))
    }

    pub fn version(&self) -> &str {
        match self {
            Self::V1(v) | Self::V2(v) => v,
        }
    }
}

impl fmt::Display for CdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1(v) => write!(f, "{}@{v}", Self::V1_CORE_PACKAGE),
            Self::V2(v) => write!(f, "{}@{v}", Self::V2_LIB_PACKAGE),
        }
    }
}
