//! Recording registry tool for comparator and updater tests

use async_trait::async_trait;
use retag_core::{Error, MutationOp, Result};
use retag_image::{ImageReference, RegistryTool};
use std::collections::HashMap;
use std::sync::Mutex;

use super::constants::manifest_json;

/// A registry operation as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Inspect(String),
    Pull(String),
    Tag(String, String),
    Push(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::Inspect(_))
    }
}

/// In-memory [`RegistryTool`]
///
/// Images without a registered manifest fail inspection, like an image
/// that has not been pushed yet.
#[derive(Default)]
pub struct RecordingTool {
    manifests: HashMap<String, String>,
    failing: Option<MutationOp>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a manifest with `digest` for `reference`
    pub fn with_digest(self, reference: &str, digest: &str) -> Self {
        self.with_raw_manifest(reference, &manifest_json(digest))
    }

    /// Serve an arbitrary inspection response for `reference`
    pub fn with_raw_manifest(mut self, reference: &str, raw: &str) -> Self {
        self.manifests.insert(reference.to_string(), raw.to_string());
        self
    }

    /// Make one mutation fail
    pub fn failing(mut self, op: MutationOp) -> Self {
        self.failing = Some(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: MutationOp, reference: &ImageReference) -> Result<()> {
        if self.failing == Some(op) {
            Err(Error::mutation(op, reference.to_string(), "docker exited with exit status: 1"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RegistryTool for RecordingTool {
    fn name(&self) -> &str {
        "recording"
    }

    async fn inspect_manifest(&self, image: &ImageReference) -> Result<String> {
        let reference = image.to_string();
        self.record(Call::Inspect(reference.clone()));
        self.manifests
            .get(&reference)
            .cloned()
            .ok_or_else(|| Error::inspection(reference, "manifest unknown"))
    }

    async fn pull(&self, image: &ImageReference) -> Result<()> {
        self.record(Call::Pull(image.to_string()));
        self.check(MutationOp::Pull, image)
    }

    async fn tag(&self, source: &ImageReference, target: &ImageReference) -> Result<()> {
        self.record(Call::Tag(source.to_string(), target.to_string()));
        self.check(MutationOp::Tag, target)
    }

    async fn push(&self, image: &ImageReference) -> Result<()> {
        self.record(Call::Push(image.to_string()));
        self.check(MutationOp::Push, image)
    }
}
