//! Shared constants for test infrastructure

pub const REPOSITORY: &str = "temporalio/temporal";

pub const RELEASE_TAG: &str = "v1.22.0";
pub const VERSION: &str = "1.22.0";

pub const SOURCE_IMAGE: &str = "temporalio/temporal:1.22.0";
pub const LATEST_IMAGE: &str = "temporalio/temporal:latest";

pub const INPUT_SHA: &str = "sha256:abc123";
pub const PINNED_IMAGE: &str = "temporalio/temporal@sha256:abc123";

pub const DIGEST_A: &str =
    "sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7";
pub const DIGEST_B: &str =
    "sha256:9a5e4c0b1f3d2e7a8c6b5d4e3f2a1b0c9d8e7f6a5b4c3d2e1f0a9b8c7d6e5f4a";

/// A `docker manifest inspect` response carrying the given config digest
pub fn manifest_json(digest: &str) -> String {
    format!(
        r#"{{"schemaVersion":2,"mediaType":"application/vnd.docker.distribution.manifest.v2+json","config":{{"mediaType":"application/vnd.docker.container.image.v1+json","size":7023,"digest":"{}"}},"layers":[]}}"#,
        digest
    )
}
