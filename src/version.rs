use serde::{Deserialize, Serialize};

/// First release that accepts `workspace select -or-create`.
const OR_CREATE_SINCE: semver::Version = semver::Version::new(1, 4, 0);

/// Parsed `terraform version -json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub version_str: String,
    pub platform: String,
    pub latest: bool,
}

#[derive(Debug, Deserialize)]
struct RawVersion {
    terraform_version: String,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    terraform_outdated: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VersionParseError {
    #[error("invalid version JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid version string {raw:?}: {source}")]
    Semver {
        raw: String,
        #[source]
        source: semver::Error,
    },
}

impl VersionInfo {
    pub fn parse_json(stdout: &str) -> Result<Self, VersionParseError> {
        let raw: RawVersion = serde_json::from_str(stdout)?;
        let parsed = semver::Version::parse(raw.terraform_version.trim_start_matches('v'))
            .map_err(|source| VersionParseError::Semver {
                raw: raw.terraform_version.clone(),
                source,
            })?;

        Ok(Self {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            version_str: raw.terraform_version,
            platform: raw.platform.unwrap_or_default(),
            latest: !raw.terraform_outdated,
        })
    }

    fn semver(&self) -> semver::Version {
        semver::Version::new(self.major, self.minor, self.patch)
    }

    /// Whether `workspace select` understands `-or-create`.
    pub fn supports_or_create(&self) -> bool {
        self.semver() >= OR_CREATE_SINCE
    }
}
