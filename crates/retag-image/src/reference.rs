//! Release reference normalization and image reference building
//!
//! Everything in here is pure: no registry access, no I/O.

use crate::types::ImageReference;
use regex::Regex;
use retag_core::{Error, Result, Settings};
use std::fmt;
use std::sync::LazyLock;

/// Marker some release tags carry in front of the version
pub const VERSION_MARKER: char = 'v';

/// Docker tag grammar
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("valid regex"));

/// Accepted content digest form
static DIGEST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sha256:[0-9A-Fa-f]+$").expect("valid regex"));

/// Strip a single leading `v` from a release tag.
///
/// ```
/// use retag_image::normalize_version;
///
/// assert_eq!(normalize_version("v1.22.0"), "1.22.0");
/// assert_eq!(normalize_version("1.22.0"), "1.22.0");
/// assert_eq!(normalize_version("vv1"), "v1");
/// ```
pub fn normalize_version(raw: &str) -> &str {
    raw.strip_prefix(VERSION_MARKER).unwrap_or(raw)
}

/// A normalized version, safe to use as an image tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    /// Normalize and validate a raw release tag.
    ///
    /// Empty input, a lone `v`, and anything docker would refuse as a tag
    /// are validation errors.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::validation("release tag must not be empty"));
        }

        let version = normalize_version(raw);
        if version.is_empty() {
            return Err(Error::validation(format!(
                "release tag '{}' has no version after the '{}' prefix",
                raw, VERSION_MARKER
            )));
        }

        if !TAG_PATTERN.is_match(version) {
            return Err(Error::validation(format!(
                "'{}' is not a valid image tag",
                version
            )));
        }

        Ok(Self(version.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a digest input has the `sha256:<hex>` form
pub fn validate_digest(raw: &str) -> Result<&str> {
    if !raw.starts_with("sha256:") {
        return Err(Error::validation(format!(
            "SHA must start with \"sha256:\", got '{}'",
            raw
        )));
    }
    if !DIGEST_PATTERN.is_match(raw) {
        return Err(Error::validation(format!(
            "'{}' is not a valid sha256 digest",
            raw
        )));
    }
    Ok(raw)
}

/// The image a promotion should start from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseReference {
    /// A released version, `v` prefix already stripped
    Tag(Version),
    /// A content-addressed digest (`sha256:...`)
    Digest(String),
}

impl ReleaseReference {
    /// Build from the mutually exclusive tag / digest inputs.
    ///
    /// Exactly one must be present.
    pub fn from_inputs(tag: Option<&str>, sha: Option<&str>) -> Result<Self> {
        match (tag, sha) {
            (None, None) => Err(Error::validation(
                "Either \"tag\" or \"sha\" input must be provided",
            )),
            (Some(_), Some(_)) => Err(Error::validation(
                "Only one of \"tag\" or \"sha\" should be provided, not both",
            )),
            (Some(tag), None) => Ok(Self::Tag(Version::parse(tag)?)),
            (None, Some(sha)) => Ok(Self::Digest(validate_digest(sha)?.to_string())),
        }
    }

    /// Short label for log lines: the version or the digest
    pub fn label(&self) -> &str {
        match self {
            ReleaseReference::Tag(version) => version.as_str(),
            ReleaseReference::Digest(digest) => digest,
        }
    }
}

impl fmt::Display for ReleaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseReference::Tag(version) => write!(f, "tag {}", version),
            ReleaseReference::Digest(digest) => write!(f, "SHA {}", digest),
        }
    }
}

/// Source and latest references for one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub version: Version,
    pub source: ImageReference,
    pub latest: ImageReference,
}

/// Substitutes versions and digests into the repository namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceBuilder {
    repository: String,
    latest_tag: String,
}

impl ReferenceBuilder {
    pub fn new(repository: impl Into<String>, latest_tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            latest_tag: latest_tag.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.repository, &settings.latest_tag)
    }

    /// `repository:version`
    pub fn tagged(&self, version: &Version) -> ImageReference {
        ImageReference::tagged(&self.repository, version.as_str())
    }

    /// `repository@digest`
    pub fn pinned(&self, digest: &str) -> ImageReference {
        ImageReference::pinned(&self.repository, digest)
    }

    /// `repository:latest`
    pub fn latest(&self) -> ImageReference {
        ImageReference::tagged(&self.repository, &self.latest_tag)
    }

    /// Source image for a release reference
    pub fn source_for(&self, release: &ReleaseReference) -> ImageReference {
        match release {
            ReleaseReference::Tag(version) => self.tagged(version),
            ReleaseReference::Digest(digest) => self.pinned(digest),
        }
    }

    /// Resolve a raw release tag into version, source and latest references
    pub fn resolve(&self, release_tag: &str) -> Result<ResolvedRelease> {
        let version = Version::parse(release_tag)?;
        Ok(ResolvedRelease {
            source: self.tagged(&version),
            latest: self.latest(),
            version,
        })
    }
}
