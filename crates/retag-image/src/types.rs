use retag_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container image reference with repository and tag/digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Repository path (e.g., "temporalio/temporal")
    pub repository: String,
    /// Tag (e.g., "1.22.0") - mutually exclusive with digest
    pub tag: Option<String>,
    /// Digest (e.g., "sha256:abc123...") - mutually exclusive with tag
    pub digest: Option<String>,
}

impl ImageReference {
    /// Tag-form reference, `repository:tag`
    pub fn tagged(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: Some(tag.into()),
            digest: None,
        }
    }

    /// Digest-form reference, `repository@digest`
    pub fn pinned(repository: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: None,
            digest: Some(digest.into()),
        }
    }

    /// Parse an image reference string like "temporalio/temporal:1.22.0"
    ///
    /// A reference without tag or digest points at `latest`, the same
    /// default docker applies.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(Error::validation(format!(
                "'{}' is not a valid image reference",
                s
            )));
        }

        // Split by @ for digest references
        if let Some((repository, digest)) = s.split_once('@') {
            if repository.is_empty() || digest.is_empty() {
                return Err(Error::validation(format!(
                    "'{}' is not a valid image reference",
                    s
                )));
            }
            return Ok(Self::pinned(repository, digest));
        }

        // Split by : for tag references; a : followed by a / belongs to a
        // registry port (like localhost:5000/image)
        match s.rfind(':') {
            Some(idx) if !s[idx + 1..].contains('/') => {
                let (repository, tag) = (&s[..idx], &s[idx + 1..]);
                if repository.is_empty() || tag.is_empty() {
                    return Err(Error::validation(format!(
                        "'{}' is not a valid image reference",
                        s
                    )));
                }
                Ok(Self::tagged(repository, tag))
            }
            _ => Ok(Self::tagged(s, "latest")),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(digest) = &self.digest {
            write!(f, "{}@{}", self.repository, digest)
        } else if let Some(tag) = &self.tag {
            write!(f, "{}:{}", self.repository, tag)
        } else {
            write!(f, "{}:latest", self.repository)
        }
    }
}

/// Content hash of an image configuration, as reported by the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestDigest(String);

impl ManifestDigest {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ManifestDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image manifest as printed by `docker manifest inspect`
///
/// Only `config.digest` is required. Manifest lists (multi-arch indexes)
/// have no `config` and fail to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageManifest {
    #[serde(default)]
    pub schema_version: Option<i32>,
    #[serde(default)]
    pub media_type: Option<String>,
    pub config: ManifestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestConfig {
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    pub digest: String,
}

impl ImageManifest {
    /// Parse an inspection response and extract the config digest
    pub fn config_digest(image: &ImageReference, raw: &str) -> Result<ManifestDigest> {
        let manifest: ImageManifest = serde_json::from_str(raw).map_err(|e| {
            Error::inspection(image.to_string(), format!("unexpected manifest: {}", e))
        })?;

        if manifest.config.digest.is_empty() {
            return Err(Error::inspection(
                image.to_string(),
                "manifest config digest is empty",
            ));
        }

        Ok(ManifestDigest::new(manifest.config.digest))
    }
}
