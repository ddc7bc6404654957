//! Prompt references of the form `slug@version`

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length for prompt slugs
pub const MAX_SLUG_LENGTH: usize = 100;

/// Version keyword resolving to the highest published version
pub const LATEST: &str = "latest";

/// Alphanumeric + hyphens, cannot start or end with a hyphen
static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$").unwrap());

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)$").unwrap());

/// Reference parsing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReferenceError {
    #[error("Prompt slug cannot be empty")]
    EmptySlug,

    #[error("Prompt slug too long: {length} characters (max {max})")]
    SlugTooLong { length: usize, max: usize },

    #[error("Invalid prompt slug '{slug}': must be alphanumeric with hyphens, cannot start or end with hyphen")]
    InvalidSlug { slug: String },

    #[error("Invalid prompt version '{version}': expected MAJOR.MINOR.PATCH or 'latest'")]
    InvalidVersion { version: String },
}

/// Validate a prompt slug
pub fn validate_slug(slug: &str) -> Result<(), ReferenceError> {
    if slug.is_empty() {
        return Err(ReferenceError::EmptySlug);
    }

    if slug.len() > MAX_SLUG_LENGTH {
        return Err(ReferenceError::SlugTooLong {
            length: slug.len(),
            max: MAX_SLUG_LENGTH,
        });
    }

    if !SLUG_PATTERN.is_match(slug) {
        return Err(ReferenceError::InvalidSlug {
            slug: slug.to_string(),
        });
    }

    Ok(())
}

/// A published `MAJOR.MINOR.PATCH` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for SemanticVersion {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReferenceError::InvalidVersion {
            version: s.to_string(),
        };

        let caps = VERSION_PATTERN.captures(s).ok_or_else(invalid)?;
        let part = |i: usize| caps[i].parse::<u64>().map_err(|_| invalid());

        Ok(Self::new(part(1)?, part(2)?, part(3)?))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which version of a prompt is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    Exact(SemanticVersion),
    Latest,
}

impl VersionSpec {
    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

impl FromStr for VersionSpec {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == LATEST {
            Ok(Self::Latest)
        } else {
            s.parse().map(Self::Exact)
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(version) => write!(f, "{}", version),
            Self::Latest => write!(f, "{}", LATEST),
        }
    }
}

/// Composite key identifying a prompt version: `slug@version`
///
/// A bare slug is shorthand for `slug@latest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptReference {
    slug: String,
    version: VersionSpec,
}

impl PromptReference {
    /// Parse a reference string
    pub fn parse(reference: &str) -> Result<Self, ReferenceError> {
        let (slug, version) = match reference.split_once('@') {
            Some((slug, version)) => (slug, version.parse()?),
            None => (reference, VersionSpec::Latest),
        };

        validate_slug(slug)?;

        Ok(Self {
            slug: slug.to_string(),
            version,
        })
    }

    pub fn exact(slug: &str, version: SemanticVersion) -> Result<Self, ReferenceError> {
        validate_slug(slug)?;

        Ok(Self {
            slug: slug.to_string(),
            version: VersionSpec::Exact(version),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn version(&self) -> VersionSpec {
        self.version
    }

    pub fn is_latest(&self) -> bool {
        self.version.is_latest()
    }

    pub fn exact_version(&self) -> Option<SemanticVersion> {
        match self.version {
            VersionSpec::Exact(version) => Some(version),
            VersionSpec::Latest => None,
        }
    }
}

impl FromStr for PromptReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PromptReference {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PromptReference> for String {
    fn from(reference: PromptReference) -> Self {
        reference.to_string()
    }
}

impl fmt::Display for PromptReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.slug, self.version)
    }
}
