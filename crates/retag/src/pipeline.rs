//! Step outputs for the calling CI pipeline
//!
//! With an output file (normally `$GITHUB_OUTPUT`) pairs are appended as
//! `key=value` lines. Without one, the legacy `::set-output` workflow
//! command is printed on stdout.

use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// Delimiter for values spanning several lines
const MULTILINE_DELIMITER: &str = "RETAG_OUTPUT_EOF";

/// Where step outputs are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Append to a file
    File(Utf8PathBuf),
    /// Print `::set-output` commands on stdout
    WorkflowCommand,
}

/// Writer for named step outputs
#[derive(Debug)]
pub struct PipelineOutputs {
    sink: OutputSink,
}

impl PipelineOutputs {
    pub fn new(output_file: Option<Utf8PathBuf>) -> Self {
        let sink = match output_file {
            Some(path) if !path.as_str().trim().is_empty() => OutputSink::File(path),
            _ => OutputSink::WorkflowCommand,
        };
        Self { sink }
    }

    /// Emit one output
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() || key.contains(['=', '\n', ':']) {
            bail!("Invalid output name: {:?}", key);
        }
        debug!("Output {}={}", key, value);

        match &self.sink {
            OutputSink::File(path) => append_to_file(path, &format_file_entry(key, value)),
            OutputSink::WorkflowCommand => {
                println!("{}", format_workflow_command(key, value));
                Ok(())
            }
        }
    }
}

fn append_to_file(path: &Utf8Path, entry: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path))?;
    file.write_all(entry.as_bytes())
        .with_context(|| format!("Failed to write output file {}", path))?;
    Ok(())
}

/// `key=value` line, or a heredoc block for multi-line values
fn format_file_entry(key: &str, value: &str) -> String {
    if value.contains('\n') {
        format!(
            "{key}<<{delim}\n{value}\n{delim}\n",
            key = key,
            value = value,
            delim = MULTILINE_DELIMITER
        )
    } else {
        format!("{}={}\n", key, value)
    }
}

/// `::set-output name=key::value`, with the characters the runner decodes escaped
fn format_workflow_command(key: &str, value: &str) -> String {
    let escaped = value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::set-output name={}::{}", key, escaped)
}
